//! Command runners

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{ConfigStore, PreviewPlayer, RecordingStore};
use crate::application::RecordMessageUseCase;
use crate::domain::audio::{wav, EncodedArtifact};
use crate::domain::config::AppConfig;
use crate::domain::intercom::Collection;
use crate::domain::session::CaptureState;
use crate::infrastructure::{
    CpalCapture, IntercomClient, NoOpPreview, RodioPreview, XdgConfigStore,
};

use super::args::RecordArgs;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Fallback filename when an upload fails and no --output was given
const FALLBACK_FILE: &str = "recording.wav";

/// Record a message, preview it, and hand it off
pub async fn run_record(args: RecordArgs, config: AppConfig) -> ExitCode {
    if config.preview_or_default() {
        record_flow(args, config, RodioPreview::new()).await
    } else {
        record_flow(args, config, NoOpPreview::new()).await
    }
}

async fn record_flow<P: PreviewPlayer>(args: RecordArgs, config: AppConfig, preview: P) -> ExitCode {
    let mut presenter = Presenter::new();

    let gain = config.gain_or_default();
    let collection = config.collection_or_default();

    let use_case = RecordMessageUseCase::new(
        CpalCapture::new(),
        IntercomClient::new(config.server_url_or_default()),
        preview,
        gain,
    );

    if (gain.value() - 1.0).abs() > f32::EPSILON {
        presenter.info(&format!("Gain: {:.2}", gain.value()));
    }

    if let Err(e) = use_case.start().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let hint = match args.duration {
        Some(secs) => format!("stops after {}s, Enter to stop now, Ctrl-C to discard", secs),
        None => "Enter to stop, Ctrl-C to discard".to_string(),
    };
    presenter.start_spinner(&format!("Recording ({})", hint));

    let elapsed_task = {
        let presenter = &presenter;
        let use_case = &use_case;
        let hint = hint.clone();
        async move {
            loop {
                tokio::time::sleep(Duration::from_millis(500)).await;
                presenter.update_recording_elapsed(use_case.elapsed_ms(), &hint);
            }
        }
    };

    let discard_requested = tokio::select! {
        requested = wait_for_stop(args.duration) => requested,
        _ = elapsed_task => false,
    };

    presenter.stop_spinner();

    if discard_requested {
        if let Err(e) = use_case.discard().await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.warn("Recording discarded");
        return ExitCode::from(EXIT_SUCCESS);
    }

    match use_case.stop().await {
        Ok(CaptureState::StoppedEmpty) => {
            presenter.warn("No audio captured, nothing to save");
            return ExitCode::from(EXIT_SUCCESS);
        }
        Ok(_) => {}
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let artifact = match use_case.artifact() {
        Some(artifact) => artifact,
        None => {
            presenter.error("Recording produced no artifact");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.success(&format!(
        "Recorded {:.1}s ({})",
        artifact.duration_ms() as f64 / 1000.0,
        artifact.human_readable_size()
    ));

    if let Some(path) = &args.output {
        if let Err(e) = write_artifact(path, &artifact).await {
            presenter.error(&format!("Failed to write {}: {}", path.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.info(&format!("Wrote {}", path.display()));
    }

    // With preview disabled this is routed through the no-op player
    presenter.start_spinner("Playing preview...");
    let result = use_case.play_preview().await;
    presenter.stop_spinner();
    if let Err(e) = result {
        presenter.warn(&format!("Preview skipped: {}", e));
    }

    if args.no_upload {
        return ExitCode::from(EXIT_SUCCESS);
    }

    match use_case.save(collection).await {
        Ok(info) => {
            presenter.success(&format!("Saved to {} (id: {})", collection, info.id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            // The artifact survives a failed upload; keep a local copy so
            // the user can retry without re-recording.
            if args.output.is_none() {
                let fallback = PathBuf::from(FALLBACK_FILE);
                match write_artifact(&fallback, &artifact).await {
                    Ok(()) => presenter.info(&format!(
                        "Kept local copy at {}; retry with: doorline upload {}",
                        fallback.display(),
                        fallback.display()
                    )),
                    Err(write_err) => presenter.error(&format!(
                        "Failed to keep local copy: {}",
                        write_err
                    )),
                }
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Upload an existing WAV file
pub async fn run_upload(
    file: &Path,
    collection_override: Option<Collection>,
    config: AppConfig,
) -> ExitCode {
    let presenter = Presenter::new();
    let collection = collection_override.unwrap_or_else(|| config.collection_or_default());

    let bytes = match tokio::fs::read(file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            presenter.error(&format!("Failed to read {}: {}", file.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Parse the container up front so we can send the real duration and
    // reject non-WAV input before it hits the server.
    let buffer = match wav::decode(&bytes) {
        Ok(buffer) => buffer,
        Err(e) => {
            presenter.error(&format!("{} is not a valid WAV file: {}", file.display(), e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let artifact = EncodedArtifact::new(bytes, buffer.duration_ms());
    let client = IntercomClient::new(config.server_url_or_default());

    match client.upload(collection, &artifact).await {
        Ok(info) => {
            presenter.success(&format!("Saved to {} (id: {})", collection, info.id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List recordings in a collection
pub async fn run_list(collection_override: Option<Collection>, config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let collection = collection_override.unwrap_or_else(|| config.collection_or_default());
    let client = IntercomClient::new(config.server_url_or_default());

    let records = match client.list(collection).await {
        Ok(records) => records,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if records.is_empty() {
        presenter.info(&format!("No recordings in {}", collection));
        return ExitCode::from(EXIT_SUCCESS);
    }

    for record in &records {
        presenter.output(&format!(
            "{}  {:.1}s  {}  {}",
            record.id,
            record.length as f64 / 1000.0,
            record.record_timestamp,
            client.download_url(collection, &record.id)
        ));
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Delete one recording by id
pub async fn run_delete(
    id: &str,
    collection_override: Option<Collection>,
    config: AppConfig,
) -> ExitCode {
    let presenter = Presenter::new();
    let collection = collection_override.unwrap_or_else(|| config.collection_or_default());
    let client = IntercomClient::new(config.server_url_or_default());

    match client.delete(collection, id).await {
        Ok(()) => {
            presenter.success(&format!("Deleted {} from {}", id, collection));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Wait for a stop condition. Returns true when the user asked to discard.
async fn wait_for_stop(duration_secs: Option<u64>) -> bool {
    let stdin_enter = async {
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let _ = reader.read_line(&mut line).await;
    };

    match duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => false,
                _ = stdin_enter => false,
                _ = tokio::signal::ctrl_c() => true,
            }
        }
        None => {
            tokio::select! {
                _ = stdin_enter => false,
                _ = tokio::signal::ctrl_c() => true,
            }
        }
    }
}

async fn write_artifact(path: &Path, artifact: &EncodedArtifact) -> std::io::Result<()> {
    tokio::fs::write(path, artifact.data()).await
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli (the server flag reads its env var via clap)
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
