use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Log every file passing through a build step"
)]
pub struct Cli {
    /// Directory to walk (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Use a predefined set of options from presets.toml (or `edit` / `clean`)
    #[arg(long)]
    pub preset: Option<String>,

    /// Patterns for files to include (e.g., 'src/**/*.rs')
    #[arg(long, num_args = 1..)]
    pub include: Option<Vec<String>>,

    /// Patterns for files or directories to exclude
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Label appended to every logged file
    #[arg(long)]
    pub action: Option<String>,

    /// Decoration printed before every logged file
    #[arg(long)]
    pub prefix: Option<String>,

    /// Decoration printed after every logged file
    #[arg(long)]
    pub suffix: Option<String>,

    /// Show cwd, base, path and stat metadata for every file
    #[arg(long)]
    pub verbose: bool,

    /// Show cwd, base and path instead of the relative path
    #[arg(long)]
    pub full: bool,

    /// Only print the number of files
    #[arg(long)]
    pub count_only: bool,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_loader: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not read file contents (sizes are reported as 0 B)
    #[arg(long)]
    pub no_contents: bool,
}
