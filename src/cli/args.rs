//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::intercom::Collection;

/// Doorline - record and upload voice messages to an intercom unit
#[derive(Parser, Debug)]
#[command(name = "doorline")]
#[command(version)]
#[command(about = "Record, condition and upload voice messages to a doorline intercom unit")]
#[command(long_about = None)]
pub struct Cli {
    /// Intercom server base URL
    #[arg(long, global = true, value_name = "URL", env = "DOORLINE_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a message from the microphone and upload it
    Record(RecordArgs),
    /// Upload a previously saved WAV file
    Upload(UploadArgs),
    /// List stored recordings
    List {
        /// Collection to list
        #[arg(short, long, value_name = "COLLECTION", value_enum)]
        collection: Option<CollectionArg>,
    },
    /// Delete a stored recording by id
    Delete {
        /// Record id
        id: String,
        /// Collection the record lives in
        #[arg(short, long, value_name = "COLLECTION", value_enum)]
        collection: Option<CollectionArg>,
    },
    /// Show or change the unit's settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the record command
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Input gain (0.0 - 2.0); values above 1.0 overdrive
    #[arg(short, long, value_name = "GAIN")]
    pub gain: Option<f32>,

    /// Also write the WAV to a local file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Collection to upload into
    #[arg(short, long, value_name = "COLLECTION", value_enum)]
    pub collection: Option<CollectionArg>,

    /// Stop automatically after this many seconds
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Skip the upload, keep the recording local only
    #[arg(long)]
    pub no_upload: bool,

    /// Skip the local playback preview
    #[arg(long)]
    pub no_preview: bool,
}

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// WAV file to upload
    pub file: PathBuf,

    /// Collection to upload into
    #[arg(short, long, value_name = "COLLECTION", value_enum)]
    pub collection: Option<CollectionArg>,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Fetch and display the unit's settings
    Show,
    /// Change one settings field (sends the full object back)
    Set {
        /// Settings key (e.g. autoRing, ringCount)
        key: String,
        /// New value
        value: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Collection argument for clap
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollectionArg {
    Messages,
    Records,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Messages => Collection::Messages,
            CollectionArg::Records => Collection::Records,
        }
    }
}

/// Valid client config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["server_url", "gain", "collection", "preview"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
