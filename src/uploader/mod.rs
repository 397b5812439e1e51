// Uploader module - pins campaign media to IPFS
//
// The orchestrator sequences the story and image uploads; the Pinata client
// speaks the pinning gateway's multipart API.

pub mod orchestrator;
pub mod pinata_client;

pub use orchestrator::{run as upload_files, FieldOutcome, UploadReport};
pub use pinata_client::{PinBlob, PinResponse, PinataClient, PinningService};
