use crate::app::models::{FileRecord, FileStat, RuntimeConfig};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Walks a directory and produces the file records fed to the logger.
pub struct Scanner {
    root: PathBuf,
    cwd: PathBuf,
    read_contents: bool,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl Scanner {
    pub fn new(cwd: PathBuf, config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            root: config.root.clone(),
            cwd,
            read_contents: config.read_contents,
            include_set: build_globset(&config.include)?,
            exclude_set: build_globset(&config.exclude)?,
        })
    }

    /// Matching files, sorted by path. Walk and read errors are skipped.
    pub fn scan(&self) -> Vec<FileRecord> {
        let mut paths = Vec::new();

        // Standard ignore walker (handles .gitignore automatically)
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if self.is_match(entry.path()) {
                        paths.push(entry.into_path());
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        paths.sort();
        log::debug!("Matched {} files under {}", paths.len(), self.root.display());

        paths
            .into_iter()
            .filter_map(|path| match self.record_for(&path) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("Skipping {}: {:#}", path.display(), err);
                    None
                }
            })
            .collect()
    }

    fn is_match(&self, path: &Path) -> bool {
        if path == self.root || !path.is_file() {
            return false;
        }

        // Hidden files are walked, so the .git directory has to be skipped by hand.
        if path.components().any(|c| c.as_os_str() == ".git") {
            return false;
        }

        let Some(relative) = diff_paths(path, &self.root) else {
            return false;
        };

        if self.exclude_set.is_match(&relative) {
            return false;
        }

        self.include_set.is_empty() || self.include_set.is_match(&relative)
    }

    fn record_for(&self, path: &Path) -> Result<FileRecord> {
        let meta = fs::metadata(path).context("Failed to read metadata")?;
        let contents = if self.read_contents {
            Some(fs::read(path).context("Failed to read file")?)
        } else {
            None
        };

        Ok(FileRecord {
            cwd: Some(self.cwd.clone()),
            base: Some(self.root.clone()),
            path: Some(path.to_path_buf()),
            contents,
            stat: Some(FileStat::from(&meta)),
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).context(format!("Invalid glob pattern: {}", pat))?);
    }
    Ok(builder.build()?)
}
