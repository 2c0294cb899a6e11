use serde::Serialize;
use std::fs::Metadata;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Spacer used in front of the header, footer and default prefix.
pub const LOG_SPACER: &str = "          ";

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub read_contents: bool,
    pub options: LoggerOptions,
}

/// Rewrites a queued line right before it is printed.
pub type Modifier = Arc<dyn Fn(LineRecord) -> LineRecord + Send + Sync>;

/// Options for one logger instance.
#[derive(Clone)]
pub struct LoggerOptions {
    pub prefix: String,
    pub suffix: String,
    pub action: String,
    pub show_loader: bool,
    pub minimal: bool,
    pub show_files: bool,
    pub verbose: bool,
    pub color: bool,
    pub modifier: Option<Modifier>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            prefix: format!("{}├──", LOG_SPACER),
            suffix: String::new(),
            action: String::new(),
            show_loader: true,
            minimal: true,
            show_files: true,
            verbose: false,
            color: true,
            modifier: None,
        }
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("action", &self.action)
            .field("show_loader", &self.show_loader)
            .field("minimal", &self.minimal)
            .field("show_files", &self.show_files)
            .field("verbose", &self.verbose)
            .field("color", &self.color)
            .field("modifier", &self.modifier.as_ref().map(|_| "Fn"))
            .finish()
    }
}

impl LoggerOptions {
    /// Verbose output always renders the full block.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.verbose = true;
            self.minimal = false;
        }
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_modifier<F>(mut self, modifier: F) -> Self
    where
        F: Fn(LineRecord) -> LineRecord + Send + Sync + 'static,
    {
        self.modifier = Some(Arc::new(modifier));
        self
    }
}

/// A file traveling through the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecord {
    pub cwd: Option<PathBuf>,
    pub base: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub contents: Option<Vec<u8>>,
    pub stat: Option<FileStat>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_stat(mut self, stat: FileStat) -> Self {
        self.stat = Some(stat);
        self
    }

    /// Byte length of the in-memory contents, 0 when there are none.
    pub fn size(&self) -> u64 {
        self.contents.as_ref().map_or(0, |c| c.len() as u64)
    }
}

/// Stat metadata carried alongside a file record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileStat {
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atime_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctime_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthtime_ms: Option<u64>,
}

impl From<&Metadata> for FileStat {
    fn from(meta: &Metadata) -> Self {
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            Some(meta.permissions().mode())
        };
        #[cfg(not(unix))]
        let mode = None;

        // Inode change time; unix only.
        #[cfg(unix)]
        let ctime_ms = {
            use std::os::unix::fs::MetadataExt;
            let millis = meta.ctime() * 1000 + meta.ctime_nsec() / 1_000_000;
            u64::try_from(millis).ok()
        };
        #[cfg(not(unix))]
        let ctime_ms = None;

        Self {
            size: meta.len(),
            mode,
            is_file: meta.is_file(),
            is_dir: meta.is_dir(),
            is_symlink: meta.file_type().is_symlink(),
            readonly: meta.permissions().readonly(),
            mtime_ms: meta.modified().ok().and_then(unix_millis),
            atime_ms: meta.accessed().ok().and_then(unix_millis),
            ctime_ms,
            birthtime_ms: meta.created().ok().and_then(unix_millis),
        }
    }
}

fn unix_millis(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as u64)
}

/// Path data of the source record, kept for modifiers. Contents stay with
/// the forwarded record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSnapshot {
    pub cwd: Option<PathBuf>,
    pub base: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub stat: Option<FileStat>,
}

impl From<&FileRecord> for FileSnapshot {
    fn from(file: &FileRecord) -> Self {
        Self {
            cwd: file.cwd.clone(),
            base: file.base.clone(),
            path: file.path.clone(),
            stat: file.stat.clone(),
        }
    }
}

/// One queued report line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub output: String,
    pub absolute: String,
    pub relative: String,
    pub size: u64,
    pub size_label: String,
    pub action: String,
    pub file: FileSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    #[test]
    fn ctime_is_the_inode_change_time() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        let meta = fs::metadata(&path).unwrap();
        let stat = FileStat::from(&meta);
        let expected = (meta.ctime() * 1000 + meta.ctime_nsec() / 1_000_000) as u64;
        assert_eq!(stat.ctime_ms, Some(expected));
        assert_eq!(stat.mode.map(|m| m & 0o777), Some(0o600));
        assert_eq!(stat.size, 3);
    }

    #[test]
    fn options_debug_hides_modifier_body() {
        let options = LoggerOptions::default().with_modifier(|line| line);
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("modifier: Some(\"Fn\")"));
    }
}
