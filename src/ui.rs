use serde::Serialize;

use crate::campaign::StartGate;
use crate::form_state::{CampaignDraft, UploadState};

/// The upload button as the form renders it
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum UploadControl {
    /// Disabled button showing a spinner
    Spinner,
    UploadTrigger,
    DoneLabel,
}

impl UploadControl {
    pub fn project(state: UploadState) -> Self {
        match state {
            UploadState::Uploading => UploadControl::Spinner,
            UploadState::Idle => UploadControl::UploadTrigger,
            UploadState::Done => UploadControl::DoneLabel,
        }
    }

    /// Same table for callers still holding the two separate flags.
    /// `upload_loading` wins over `uploaded`.
    pub fn project_flags(upload_loading: bool, uploaded: bool) -> Self {
        match (upload_loading, uploaded) {
            (true, _) => UploadControl::Spinner,
            (false, false) => UploadControl::UploadTrigger,
            (false, true) => UploadControl::DoneLabel,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, UploadControl::UploadTrigger)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadControl::Spinner => "Uploading...",
            UploadControl::UploadTrigger => "Upload Files to IPFS",
            UploadControl::DoneLabel => "Files uploaded Successfully",
        }
    }
}

/// The "Start Campaign" button
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct StartControl {
    pub enabled: bool,
}

impl StartControl {
    pub fn project(draft: &CampaignDraft, gate: StartGate) -> Self {
        Self {
            enabled: gate.allows(draft),
        }
    }

    pub fn label(&self) -> &'static str {
        "Start Campaign"
    }
}
