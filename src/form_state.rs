use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Education,
    Health,
    Animal,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Education, Category::Health, Category::Animal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Animal => "Animal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation("category", "Must be Education, Health or Animal"))
    }
}

/// Where the draft is in the upload lifecycle.
///
/// Replaces the pair of `uploadLoading` / `uploaded` flags; `Done` is terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Done,
}

impl UploadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Uploading)
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadState::Done)
    }
}

/// A cover image selected by the user, held in memory until it is pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    pub required_amount: String,
    pub category: Category,
    pub story: String,
    pub image: Option<ImageFile>,
    pub story_url: String,
    pub image_url: String,
    pub upload_state: UploadState,
}

impl CampaignDraft {
    pub fn uploaded(&self) -> bool {
        self.upload_state.is_uploaded()
    }
}

/// Shared handle to the campaign draft.
///
/// Cloning the handle shares the draft. Locks are never held across an await.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: Arc<Mutex<CampaignDraft>>,
}

impl FormState {
    pub fn new(draft: CampaignDraft) -> Self {
        Self {
            draft: Arc::new(Mutex::new(draft)),
        }
    }

    /// Snapshot of the whole draft
    pub fn form(&self) -> CampaignDraft {
        self.read("form snapshot", |draft| draft.clone())
            .unwrap_or_default()
    }

    pub fn image(&self) -> Option<ImageFile> {
        self.read("image read", |draft| draft.image.clone()).flatten()
    }

    pub fn upload_state(&self) -> UploadState {
        self.read("upload state read", |draft| draft.upload_state)
            .unwrap_or_default()
    }

    pub fn set_required_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        self.update("required amount", |draft| draft.required_amount = amount);
    }

    pub fn set_category(&self, category: Category) {
        self.update("category", |draft| draft.category = category);
    }

    pub fn set_story(&self, story: impl Into<String>) {
        let story = story.into();
        self.update("story", |draft| draft.story = story);
    }

    pub fn set_image(&self, image: Option<ImageFile>) {
        self.update("image", |draft| draft.image = image);
    }

    pub fn set_story_url(&self, content_id: impl Into<String>) {
        let content_id = content_id.into();
        self.update("story url", |draft| draft.story_url = content_id);
    }

    pub fn set_image_url(&self, content_id: impl Into<String>) {
        let content_id = content_id.into();
        self.update("image url", |draft| draft.image_url = content_id);
    }

    pub fn set_upload_state(&self, state: UploadState) {
        self.update("upload state", |draft| {
            log::debug!("Upload state: {:?} -> {:?}", draft.upload_state, state);
            draft.upload_state = state;
        });
    }

    /// Moves `Idle` to `Uploading` under a single lock. Returns false, leaving
    /// the state untouched, when an upload is running or already done.
    pub fn begin_upload(&self) -> bool {
        match self.draft.lock() {
            Ok(mut draft) => {
                if draft.upload_state != UploadState::Idle {
                    return false;
                }
                draft.upload_state = UploadState::Uploading;
                log::debug!("Upload state: Idle -> Uploading");
                true
            }
            Err(e) => {
                log::error!(
                    "Failed to acquire form state lock to begin upload (non-critical): {}",
                    e
                );
                false
            }
        }
    }

    fn update<F>(&self, operation: &str, f: F)
    where
        F: FnOnce(&mut CampaignDraft),
    {
        match self.draft.lock() {
            Ok(mut draft) => f(&mut draft),
            Err(e) => {
                log::error!(
                    "Failed to acquire form state lock for {} update (non-critical): {}",
                    operation,
                    e
                );
            }
        }
    }

    fn read<F, R>(&self, operation: &str, f: F) -> Option<R>
    where
        F: FnOnce(&CampaignDraft) -> R,
    {
        match self.draft.lock() {
            Ok(draft) => Some(f(&draft)),
            Err(e) => {
                log::error!(
                    "Failed to acquire form state lock for {} (non-critical): {}",
                    operation,
                    e
                );
                None
            }
        }
    }
}
