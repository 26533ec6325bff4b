//! Doorline CLI entry point

use std::process::ExitCode;

use clap::Parser;

use doorline::cli::{
    app::{load_merged_config, run_delete, run_list, run_record, run_upload, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    settings_cmd::handle_settings_command,
};
use doorline::domain::config::AppConfig;
use doorline::domain::intercom::Collection;
use doorline::infrastructure::{IntercomClient, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Global overrides; the record command adds its own on top
    let cli_config = AppConfig {
        server_url: cli.server.clone(),
        ..Default::default()
    };

    match cli.command {
        // Config management needs no server
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Record(args) => {
            let overrides = AppConfig {
                server_url: cli.server,
                gain: args.gain,
                collection: args.collection.map(|c| Collection::from(c).to_string()),
                preview: if args.no_preview { Some(false) } else { None },
            };
            let config = load_merged_config(overrides).await;
            run_record(args, config).await
        }
        Commands::Upload(args) => {
            let config = load_merged_config(cli_config).await;
            run_upload(&args.file, args.collection.map(Collection::from), config).await
        }
        Commands::List { collection } => {
            let config = load_merged_config(cli_config).await;
            run_list(collection.map(Collection::from), config).await
        }
        Commands::Delete { id, collection } => {
            let config = load_merged_config(cli_config).await;
            run_delete(&id, collection.map(Collection::from), config).await
        }
        Commands::Settings { action } => {
            let config = load_merged_config(cli_config).await;
            let gateway = IntercomClient::new(config.server_url_or_default());
            if let Err(e) = handle_settings_command(action, &gateway, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
