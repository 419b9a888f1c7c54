//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "feature-viewer",
    version,
    about = "Upload STEP models and preview feature highlighting",
    long_about = "Upload a STEP model to the analysis service, load the generated mesh\n\
                  and list the features it reports. A feature can be highlighted to\n\
                  preview the material assignment the viewer would render."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Disable ANSI colors in log output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a .step/.stp file and preview the result.
    Upload(UploadArgs),

    /// Load a mesh directly, optionally with a feature list from disk.
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    /// STEP file to upload.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Analysis service base URL (overrides FEATURE_VIEWER_API_URL).
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides FEATURE_VIEWER_TIMEOUT_SECS).
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Answer with the built-in sample response instead of calling the service.
    #[arg(long = "mock")]
    pub mock: bool,

    #[command(flatten)]
    pub preview: PreviewArgs,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Mesh URL or local path (.gltf/.glb).
    #[arg(value_name = "MESH")]
    pub mesh: String,

    /// JSON array of features, as returned by the service.
    #[arg(long = "features", value_name = "PATH")]
    pub features: Option<PathBuf>,

    /// Timeout in seconds for fetching remote meshes.
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub preview: PreviewArgs,
}

#[derive(Args, Default)]
pub struct PreviewArgs {
    /// Feature id to highlight after loading.
    #[arg(long = "highlight", value_name = "FEATURE_ID")]
    pub highlight: Option<String>,

    /// List features without fetching the mesh.
    #[arg(long = "no-load")]
    pub no_load: bool,

    /// Colour of unhighlighted meshes (#rrggbb).
    #[arg(long = "default-color", value_name = "HEX")]
    pub default_color: Option<String>,

    /// Colour of highlighted meshes (#rrggbb).
    #[arg(long = "highlight-color", value_name = "HEX")]
    pub highlight_color: Option<String>,

    /// Print the view as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
}
