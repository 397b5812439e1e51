use std::env;
use std::sync::Arc;

use anyhow::Context;
use campaign_uploader::campaign::{CampaignLauncher, ManifestFileStarter, StartGate};
use campaign_uploader::config::{self, Config, PinataCredentials};
use campaign_uploader::errors::AppResult;
use campaign_uploader::form_state::{Category, FormState};
use campaign_uploader::notifier::ConsoleNotifier;
use campaign_uploader::security::InputValidator;
use campaign_uploader::ui::{StartControl, UploadControl};
use campaign_uploader::uploader::{self, PinataClient};

const USAGE: &str = "Usage: campaign-uploader <required_amount> <category> [--story <file>] [--image <file>] [--require-upload]\n       campaign-uploader --reset-config";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    required_amount: String,
    category: String,
    story_path: Option<String>,
    image_path: Option<String>,
    require_upload: bool,
    reset_config: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--story" => {
                parsed.story_path = Some(iter.next().ok_or("--story needs a file")?.clone());
            }
            "--image" => {
                parsed.image_path = Some(iter.next().ok_or("--image needs a file")?.clone());
            }
            "--require-upload" => parsed.require_upload = true,
            "--reset-config" => parsed.reset_config = true,
            other if other.starts_with("--") => return Err(format!("Unknown option {}", other)),
            other => positional.push(other.to_string()),
        }
    }

    if parsed.reset_config {
        return Ok(parsed);
    }

    match positional.as_slice() {
        [amount, category] => {
            parsed.required_amount = amount.clone();
            parsed.category = category.clone();
            Ok(parsed)
        }
        _ => Err("Expected <required_amount> and <category>".to_string()),
    }
}

/// Level to apply once the config is known. `None` leaves an explicit
/// RUST_LOG in charge.
fn configured_level(loaded: &AppResult<Config>, rust_log_set: bool) -> Option<log::LevelFilter> {
    if rust_log_set {
        return None;
    }

    Some(
        loaded
            .as_ref()
            .map(|c| c.log_filter())
            .unwrap_or(log::LevelFilter::Info),
    )
}

#[tokio::main]
async fn main() {
    let rust_log_set = env::var("RUST_LOG").is_ok();

    // The logger passes everything; the global max level does the filtering
    // so the configured level can be applied after the config is read.
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Trace).parse_default_env();
    builder.init();
    if !rust_log_set {
        log::set_max_level(log::LevelFilter::Info);
    }

    let loaded = config::load_config();
    if let Some(level) = configured_level(&loaded, rust_log_set) {
        log::set_max_level(level);
    }

    log::info!("Starting Campaign Uploader");

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(cli, loaded).await {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CliArgs, loaded: AppResult<Config>) -> anyhow::Result<()> {
    if cli.reset_config {
        config::reset_config().context("Failed to reset configuration")?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let config = loaded.context("Failed to load configuration")?;

    InputValidator::validate_required_amount(&cli.required_amount)?;
    let category: Category = cli.category.parse()?;

    let form_state = FormState::default();
    form_state.set_required_amount(cli.required_amount.trim());
    form_state.set_category(category);

    if let Some(story_path) = &cli.story_path {
        InputValidator::validate_file_path(story_path)?;
        let story = tokio::fs::read_to_string(story_path)
            .await
            .with_context(|| format!("Failed to read story from {}", story_path))?;
        form_state.set_story(story);
    }

    if let Some(image_path) = &cli.image_path {
        let image = InputValidator::load_image_file(image_path, config.max_image_size_mb).await?;
        form_state.set_image(Some(image));
    }

    let credentials = PinataCredentials::from_env();
    let client = PinataClient::new(
        &config.pinata_endpoint,
        credentials,
        config.request_timeout(),
    )?;
    log::info!("Pinning via {}", client.endpoint());

    let gate = if cli.require_upload {
        StartGate::RequireUploaded
    } else {
        config.start_gate
    };

    println!("[{}]", UploadControl::project(form_state.upload_state()).label());

    let report = uploader::upload_files(&form_state, &client, &ConsoleNotifier).await;
    log::debug!("Upload report: {:?}", report);

    let draft = form_state.form();
    println!("[{}]", UploadControl::project(draft.upload_state).label());
    if !draft.story_url.is_empty() {
        println!("Story: ipfs://{}", draft.story_url);
    }
    if !draft.image_url.is_empty() {
        println!("Image: ipfs://{}", draft.image_url);
    }

    let start = StartControl::project(&draft, gate);
    if !start.enabled {
        anyhow::bail!("{} is disabled until files are uploaded", start.label());
    }

    let starter = Arc::new(ManifestFileStarter::new(config.manifests_directory()?));
    let launcher = CampaignLauncher::new(starter, gate);
    let reference = launcher.start(&form_state).await?;
    println!("Campaign handed off: {}", reference);

    Ok(())
}
