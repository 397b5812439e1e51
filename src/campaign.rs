use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::form_state::{CampaignDraft, Category, FormState};

/// Whether "Start Campaign" waits for the upload step.
///
/// `Always` lets the campaign start with or without uploaded media.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartGate {
    #[default]
    Always,
    RequireUploaded,
}

impl StartGate {
    pub fn allows(&self, draft: &CampaignDraft) -> bool {
        match self {
            StartGate::Always => true,
            StartGate::RequireUploaded => draft.uploaded(),
        }
    }
}

/// Snapshot of a draft handed to whatever creates the campaign on chain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignManifest {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub required_amount: String,
    pub category: Category,
    pub story_url: String,
    pub image_url: String,
    pub uploaded: bool,
}

impl CampaignManifest {
    pub fn from_draft(draft: &CampaignDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            required_amount: draft.required_amount.clone(),
            category: draft.category,
            story_url: draft.story_url.clone(),
            image_url: draft.image_url.clone(),
            uploaded: draft.uploaded(),
        }
    }
}

/// The external "start campaign" action. Returns an opaque reference.
#[async_trait::async_trait]
pub trait CampaignStarter: Send + Sync {
    async fn start_campaign(&self, manifest: &CampaignManifest) -> AppResult<String>;
}

pub struct CampaignLauncher {
    starter: Arc<dyn CampaignStarter>,
    gate: StartGate,
}

impl CampaignLauncher {
    pub fn new(starter: Arc<dyn CampaignStarter>, gate: StartGate) -> Self {
        Self { starter, gate }
    }

    pub async fn start(&self, form_state: &FormState) -> AppResult<String> {
        let draft = form_state.form();

        if !self.gate.allows(&draft) {
            log::warn!(
                "Refusing to start campaign in state {:?} with gate {:?}",
                draft.upload_state,
                self.gate
            );
            return Err(AppError::campaign_not_ready("files have not been uploaded"));
        }

        if !draft.uploaded() {
            log::info!("Starting campaign without uploaded media");
        }

        let manifest = CampaignManifest::from_draft(&draft);
        log::info!(
            "Handing off campaign {} ({}, amount {})",
            manifest.id,
            manifest.category,
            manifest.required_amount
        );

        self.starter.start_campaign(&manifest).await
    }
}

/// Writes each manifest as `<id>.json` for a separate transaction submitter
pub struct ManifestFileStarter {
    output_dir: PathBuf,
}

impl ManifestFileStarter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait::async_trait]
impl CampaignStarter for ManifestFileStarter {
    async fn start_campaign(&self, manifest: &CampaignManifest) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(format!("{}.json", manifest.id));
        let contents = serde_json::to_string_pretty(manifest)?;
        tokio::fs::write(&path, contents).await?;

        log::info!("Campaign manifest written to {}", path.display());
        Ok(path.to_string_lossy().to_string())
    }
}
