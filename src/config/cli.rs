// Command-line arguments
// Every flag is optional and overrides the file/environment layers when given

use clap::Parser;
use std::path::PathBuf;

/// Serve local .hic files with Range request and CORS support.
///
/// By default only .hic files are served and directory listing is disabled.
/// Expose the server publicly through a reverse proxy that terminates TLS.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "hicstream", version, about, long_about = None)]
pub struct Cli {
    /// Port to serve on (default: 8020)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Directory to serve (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable directory listing (default: disabled)
    #[arg(long)]
    pub allow_dirlist: bool,

    /// Allowed file extensions (default: .hic). Use `--extensions '*'` to allow all files.
    #[arg(long, num_args = 1.., value_name = "EXT")]
    pub extensions: Option<Vec<String>>,

    /// Number of worker threads (default: CPU cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Disable the access log
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file (default: hicstream.toml in the working directory, if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
