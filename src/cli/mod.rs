//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod settings_cmd;

// Re-export commonly used types
pub use app::{
    load_merged_config, run_delete, run_list, run_record, run_upload, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction, RecordArgs, SettingsAction, UploadArgs};
pub use presenter::Presenter;
