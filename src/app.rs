// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod loader;
pub mod logger;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::io::{self, IsTerminal};

use self::cli::Cli;
use self::config::resolve_config;
use self::loader::{Loader, Spinner};
use self::logger::{LogFilesExt, LogSink, Logger};
use self::scanner::Scanner;

/// Initializes components and runs the scanned files through the logger.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let mut args = Cli::parse();
    if !io::stderr().is_terminal() {
        args.no_color = true;
    }

    // 2. Identify Project Root & Name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    // Simple heuristic: name of current folder
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(args, project_name, &current_dir)?;

    // 4. Scan Directory
    let scanner = Scanner::new(current_dir.clone(), &config)?;
    let loader: Option<Box<dyn Loader>> = if io::stderr().is_terminal() {
        Some(Box::new(Spinner::new()))
    } else {
        None
    };
    let logger = Logger::with_cwd(config.options.clone(), LogSink, loader, current_dir);

    let files = scanner.scan();
    if files.is_empty() {
        log::warn!("⚠️ No files found for the specified criteria.");
    }

    // 5. Drain the stage; the report prints once the stream ends
    let forwarded = files.into_iter().log_files(logger).count();
    log::debug!("Forwarded {} files", forwarded);

    Ok(())
}
