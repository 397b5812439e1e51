// Test support utilities for both unit and integration tests

use crate::campaign::{CampaignManifest, CampaignStarter};
use crate::errors::{AppError, AppResult};
use crate::notifier::Notifier;
use crate::uploader::{PinBlob, PinResponse, PinningService};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock pinning service for testing
///
/// Replays scripted responses in order and records every blob it receives.
/// With nothing scripted it answers with a generated `QmMock<n>` hash.
#[derive(Default)]
pub struct MockPinningService {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<PinBlob>>,
}

impl MockPinningService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, content_id: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content_id.to_string()));
    }

    pub fn push_err(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    pub fn calls(&self) -> Vec<PinBlob> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl PinningService for MockPinningService {
    async fn submit(&self, blob: PinBlob) -> AppResult<PinResponse> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(blob);
            calls.len()
        };

        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(content_id)) => Ok(PinResponse {
                ipfs_hash: content_id,
            }),
            Some(Err(reason)) => Err(AppError::upload_failed(reason)),
            None => Ok(PinResponse {
                ipfs_hash: format!("QmMock{}", call_number),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Warn(String),
}

/// Notifier that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn successes(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| matches!(n, Notification::Success(_)))
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| matches!(n, Notification::Warn(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Warn(message.to_string()));
    }
}

/// Campaign starter that records manifests instead of submitting them
#[derive(Default)]
pub struct RecordingCampaignStarter {
    started: Mutex<Vec<CampaignManifest>>,
}

impl RecordingCampaignStarter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<CampaignManifest> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CampaignStarter for RecordingCampaignStarter {
    async fn start_campaign(&self, manifest: &CampaignManifest) -> AppResult<String> {
        self.started.lock().unwrap().push(manifest.clone());
        Ok(manifest.id.to_string())
    }
}
