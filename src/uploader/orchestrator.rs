use crate::errors::AppError;
use crate::form_state::{FormState, UploadState};
use crate::notifier::Notifier;

use super::pinata_client::{PinBlob, PinningService};

/// What happened to one field during an upload run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Skipped,
    Pinned { content_id: String },
    Failed { reason: String },
}

impl FieldOutcome {
    pub fn is_pinned(&self) -> bool {
        matches!(self, FieldOutcome::Pinned { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FieldOutcome::Failed { .. })
    }
}

/// Per-field summary of a run. Informational only; a run never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub story: FieldOutcome,
    pub image: FieldOutcome,
}

impl UploadReport {
    fn skipped() -> Self {
        Self {
            story: FieldOutcome::Skipped,
            image: FieldOutcome::Skipped,
        }
    }

    pub fn failures(&self) -> usize {
        [&self.story, &self.image]
            .iter()
            .filter(|o| o.is_failed())
            .count()
    }
}

/// Which draft field a blob belongs to; carries the toast wording.
#[derive(Debug, Clone, Copy)]
enum Field {
    Story,
    Image,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Story => "story",
            Field::Image => "image",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Field::Story => "Story uploaded successfully!",
            Field::Image => "Image uploaded successfully!",
        }
    }

    fn warning_message(self) -> &'static str {
        match self {
            Field::Story => "Error uploading story",
            Field::Image => "Error uploading image",
        }
    }
}

/// Pins the draft's story and image, one after the other, then marks the
/// draft as uploaded.
///
/// A failure on one field is reported and logged but never stops the other
/// field or the final `Done` transition. Once the draft is `Done` the run is
/// a no-op: there is no re-upload path.
pub async fn run(
    form_state: &FormState,
    pinning: &dyn PinningService,
    notifier: &dyn Notifier,
) -> UploadReport {
    if !form_state.begin_upload() {
        match form_state.upload_state() {
            UploadState::Done => {
                log::info!("Files already uploaded; ignoring repeated upload request")
            }
            _ => log::warn!("Upload already in progress; ignoring repeated upload request"),
        }
        return UploadReport::skipped();
    }

    let draft = form_state.form();

    let story = if draft.story.is_empty() {
        log::debug!("No story text to upload");
        FieldOutcome::Skipped
    } else {
        let outcome = pin_field(Field::Story, PinBlob::story(&draft.story), pinning, notifier).await;
        if let FieldOutcome::Pinned { content_id } = &outcome {
            form_state.set_story_url(content_id.clone());
        }
        outcome
    };

    let image = match &draft.image {
        Some(image) => {
            let outcome = pin_field(Field::Image, PinBlob::image(image), pinning, notifier).await;
            if let FieldOutcome::Pinned { content_id } = &outcome {
                form_state.set_image_url(content_id.clone());
            }
            outcome
        }
        None => {
            log::debug!("No cover image selected");
            FieldOutcome::Skipped
        }
    };

    form_state.set_upload_state(UploadState::Done);

    let report = UploadReport { story, image };
    log::info!(
        "Upload run finished: story {:?}, image {:?} ({} failed)",
        report.story,
        report.image,
        report.failures()
    );
    report
}

async fn pin_field(
    field: Field,
    blob: PinBlob,
    pinning: &dyn PinningService,
    notifier: &dyn Notifier,
) -> FieldOutcome {
    log::info!("Uploading {} ({} bytes)", field.label(), blob.data.len());

    match pinning.submit(blob).await {
        Ok(response) => {
            log::info!("Pinned {} as {}", field.label(), response.ipfs_hash);
            notifier.success(field.success_message());
            FieldOutcome::Pinned {
                content_id: response.ipfs_hash,
            }
        }
        Err(e) => {
            report_failure(field, &e);
            notifier.warn(field.warning_message());
            FieldOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn report_failure(field: Field, error: &AppError) {
    log::error!(
        "Failed to upload {} (retryable: {}): {}",
        field.label(),
        error.is_retryable(),
        error
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_state::{CampaignDraft, ImageFile};
    use crate::errors::AppResult;
    use crate::test_support::{MockPinningService, Notification, RecordingNotifier};
    use crate::ui::UploadControl;
    use crate::uploader::PinResponse;
    use std::sync::Mutex;

    /// Pins everything and remembers the draft state seen during each submit
    struct StateWatchingPinning {
        form_state: FormState,
        seen: Mutex<Vec<UploadState>>,
    }

    #[async_trait::async_trait]
    impl PinningService for StateWatchingPinning {
        async fn submit(&self, _blob: PinBlob) -> AppResult<PinResponse> {
            self.seen.lock().unwrap().push(self.form_state.upload_state());
            Ok(PinResponse {
                ipfs_hash: "QmWatched".to_string(),
            })
        }
    }

    fn draft_with(story: &str, image: Option<ImageFile>) -> FormState {
        FormState::new(CampaignDraft {
            required_amount: "10".to_string(),
            story: story.to_string(),
            image,
            ..Default::default()
        })
    }

    fn cover() -> ImageFile {
        ImageFile::new("cover.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47])
    }

    #[tokio::test]
    async fn test_empty_draft_makes_no_calls_but_finishes() {
        let state = draft_with("", None);
        let pinning = MockPinningService::new();
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        assert_eq!(pinning.call_count(), 0);
        assert!(notifier.notifications().is_empty());
        assert_eq!(report.story, FieldOutcome::Skipped);
        assert_eq!(report.image, FieldOutcome::Skipped);
        assert_eq!(state.upload_state(), UploadState::Done);
    }

    #[tokio::test]
    async fn test_story_success_sets_story_url() {
        let state = draft_with("hello world", None);
        let pinning = MockPinningService::new();
        pinning.push_ok("Qm123");
        let notifier = RecordingNotifier::new();

        run(&state, &pinning, &notifier).await;

        let draft = state.form();
        assert_eq!(draft.story_url, "Qm123");
        assert!(draft.image_url.is_empty());
        assert!(draft.uploaded());
        assert_eq!(
            notifier.notifications(),
            vec![Notification::Success("Story uploaded successfully!".to_string())]
        );

        let calls = pinning.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].data, b"hello world".to_vec());
        assert_eq!(calls[0].mime_type, "application/json");
    }

    #[tokio::test]
    async fn test_image_server_error_leaves_url_unchanged() {
        let state = draft_with("", Some(cover()));
        let pinning = MockPinningService::new();
        pinning.push_err("Pinata API error 500 Internal Server Error");
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        let draft = state.form();
        assert!(draft.image_url.is_empty());
        assert!(draft.uploaded());
        assert!(report.image.is_failed());
        assert_eq!(pinning.call_count(), 1);
        assert_eq!(
            notifier.notifications(),
            vec![Notification::Warn("Error uploading image".to_string())]
        );
    }

    #[tokio::test]
    async fn test_story_failure_does_not_block_image() {
        let state = draft_with("my story", Some(cover()));
        let pinning = MockPinningService::new();
        pinning.push_err("connection reset");
        pinning.push_ok("QmImage");
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        assert_eq!(pinning.call_count(), 2);
        assert!(report.story.is_failed());
        assert_eq!(
            report.image,
            FieldOutcome::Pinned {
                content_id: "QmImage".to_string()
            }
        );

        let draft = state.form();
        assert!(draft.story_url.is_empty());
        assert_eq!(draft.image_url, "QmImage");
        assert_eq!(draft.upload_state, UploadState::Done);
        assert_eq!(
            notifier.notifications(),
            vec![
                Notification::Warn("Error uploading story".to_string()),
                Notification::Success("Image uploaded successfully!".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_story_is_uploaded_before_image() {
        let state = draft_with("first", Some(cover()));
        let pinning = MockPinningService::new();
        pinning.push_ok("QmStory");
        pinning.push_ok("QmImage");
        let notifier = RecordingNotifier::new();

        run(&state, &pinning, &notifier).await;

        let calls = pinning.calls();
        assert_eq!(calls[0].file_name, "blob");
        assert_eq!(calls[1].file_name, "cover.png");

        let draft = state.form();
        assert_eq!(draft.story_url, "QmStory");
        assert_eq!(draft.image_url, "QmImage");
    }

    #[tokio::test]
    async fn test_both_failures_still_reach_done() {
        let state = draft_with("story", Some(cover()));
        let pinning = MockPinningService::new();
        pinning.push_err("401 Unauthorized");
        pinning.push_err("401 Unauthorized");
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        assert_eq!(report.failures(), 2);
        assert_eq!(notifier.warnings(), 2);
        assert_eq!(state.upload_state(), UploadState::Done);
        assert!(!state.upload_state().is_loading());
    }

    #[tokio::test]
    async fn test_state_is_uploading_while_submit_runs() {
        let state = draft_with("story", Some(cover()));
        let pinning = StateWatchingPinning {
            form_state: state.clone(),
            seen: Mutex::new(Vec::new()),
        };
        let notifier = RecordingNotifier::new();

        run(&state, &pinning, &notifier).await;

        let seen = pinning.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![UploadState::Uploading, UploadState::Uploading]);
        assert_eq!(UploadControl::project(seen[0]), UploadControl::Spinner);
        assert_eq!(state.upload_state(), UploadState::Done);
    }

    #[tokio::test]
    async fn test_run_while_uploading_is_ignored() {
        let state = draft_with("story", None);
        state.set_upload_state(UploadState::Uploading);
        let pinning = MockPinningService::new();
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        assert_eq!(pinning.call_count(), 0);
        assert_eq!(report, UploadReport::skipped());
        assert_eq!(state.upload_state(), UploadState::Uploading);
    }

    #[tokio::test]
    async fn test_done_draft_is_not_uploaded_again() {
        let state = draft_with("story", Some(cover()));
        state.set_upload_state(UploadState::Done);
        let pinning = MockPinningService::new();
        let notifier = RecordingNotifier::new();

        let report = run(&state, &pinning, &notifier).await;

        assert_eq!(pinning.call_count(), 0);
        assert_eq!(report, UploadReport::skipped());
        assert!(notifier.notifications().is_empty());
    }
}
