pub mod campaign;
pub mod config;
pub mod errors;
pub mod form_state;
pub mod notifier;
pub mod security;
pub mod test_support;
pub mod ui;
pub mod uploader;
