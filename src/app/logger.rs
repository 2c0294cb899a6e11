//! Inline logging stage for a stream of file records.
//!
//! A [`Logger`] forwards every record untouched while remembering its path,
//! size and action. Once the stream ends the remembered lines are printed as
//! a numbered, aligned report followed by the item count.

use crate::app::formatter::{self, Palette};
use crate::app::loader::Loader;
use crate::app::models::{FileRecord, FileSnapshot, LineRecord, LoggerOptions, LOG_SPACER};
use pathdiff::diff_paths;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

const EDIT_GLYPH: &str = "✎";
const CLEAN_GLYPH: &str = "🗑";

/// Destination for rendered report lines.
pub trait LineSink {
    fn emit(&mut self, line: &str);
}

/// Writes every line through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LineSink for LogSink {
    fn emit(&mut self, line: &str) {
        log::info!("{}", line);
    }
}

impl LineSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl LoggerOptions {
    /// Marks every file as edited.
    pub fn edit(self) -> Self {
        let action = Palette::new(self.color).edit(EDIT_GLYPH);
        self.with_action(action)
    }

    /// Marks every file as deleted.
    pub fn clean(self) -> Self {
        let action = Palette::new(self.color).delete(CLEAN_GLYPH);
        self.with_action(action)
    }
}

pub struct Logger<S: LineSink> {
    options: LoggerOptions,
    palette: Palette,
    sink: S,
    loader: Option<Box<dyn Loader>>,
    cwd: PathBuf,
    count: usize,
    queue: Vec<LineRecord>,
}

impl<S: LineSink> Logger<S> {
    pub fn new(options: LoggerOptions, sink: S, loader: Option<Box<dyn Loader>>) -> Self {
        Self::with_cwd(options, sink, loader, cwd_or_empty(env::current_dir()))
    }

    /// Like [`Logger::new`] but resolves relative paths against `cwd`.
    pub fn with_cwd(
        options: LoggerOptions,
        sink: S,
        loader: Option<Box<dyn Loader>>,
        cwd: PathBuf,
    ) -> Self {
        let verbose = options.verbose;
        let options = options.with_verbose(verbose);
        let palette = Palette::new(options.color);

        let loader = if options.show_loader {
            loader.map(|mut loader| {
                loader.start();
                loader
            })
        } else {
            None
        };

        Self {
            options,
            palette,
            sink,
            loader,
            cwd,
            count: 0,
            queue: Vec::new(),
        }
    }

    pub fn edit(sink: S, loader: Option<Box<dyn Loader>>) -> Self {
        Self::new(LoggerOptions::default().edit(), sink, loader)
    }

    pub fn clean(sink: S, loader: Option<Box<dyn Loader>>) -> Self {
        Self::new(LoggerOptions::default().clean(), sink, loader)
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// Files seen so far, queued or not.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn queue(&self) -> &[LineRecord] {
        &self.queue
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Records one file and hands it straight back.
    pub fn on_item(&mut self, file: FileRecord) -> FileRecord {
        if self.options.show_files {
            let line = self.line_for(&file);
            self.queue.push(line);
        }
        self.count += 1;
        file
    }

    /// Prints the report. Calling it twice prints it twice.
    pub fn on_complete(&mut self) {
        if let Some(loader) = self.loader.as_mut() {
            loader.stop();
        }

        let width = formatter::digits(self.queue.len());
        self.sink.emit(&format!("{}┌── log", LOG_SPACER));

        for (i, line) in self.queue.iter().enumerate() {
            let output = match &self.options.modifier {
                Some(modifier) => modifier(line.clone()).output,
                None => line.output.clone(),
            };

            let index = (i + 1).to_string();
            let padding = " ".repeat(width.saturating_sub(index.len()));
            self.sink.emit(&format!(
                "{} {}{} {} {}",
                self.options.prefix,
                self.palette.count(&index),
                padding,
                output,
                self.options.suffix
            ));
        }

        let total = format!("{} {}", self.count, formatter::pluralize("item", self.count));
        self.sink
            .emit(&format!("{}└── {}", LOG_SPACER, self.palette.count(&total)));
    }

    fn line_for(&self, file: &FileRecord) -> LineRecord {
        let absolute = file
            .path
            .as_deref()
            .map(|p| self.cwd.join(p))
            .unwrap_or_default();
        let relative = if file.path.is_some() {
            diff_paths(&absolute, &self.cwd)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| absolute.display().to_string())
        } else {
            String::new()
        };

        let rendered_path = if self.options.minimal {
            self.palette.prop(&relative)
        } else {
            self.full_block(file)
        };

        let size = file.size();
        let size_label = self.palette.size(&formatter::pretty_bytes(size));

        LineRecord {
            output: format!("=> {} {} {}", rendered_path, size_label, self.options.action),
            absolute: absolute.display().to_string(),
            relative,
            size,
            size_label,
            action: self.options.action.clone(),
            file: FileSnapshot::from(file),
        }
    }

    fn full_block(&self, file: &FileRecord) -> String {
        let mut lines = Vec::new();
        let mut push_path = |label: &str, path: Option<&Path>| {
            if let Some(path) = path {
                lines.push(format!("{}{}", label, self.palette.prop(&formatter::tildify(path))));
            }
        };
        push_path("cwd:   ", file.cwd.as_deref());
        push_path("base:  ", file.base.as_deref());
        push_path("path:  ", file.path.as_deref());

        if self.options.verbose {
            if let Some(stat) = &file.stat {
                lines.push(format!("stat:  {}", self.palette.prop(&formatter::stat_dump(stat))));
            }
        }

        format!("\n{}\n", lines.join("\n"))
    }
}

/// Paths stay absolute when the working directory is unknown.
fn cwd_or_empty(cwd: io::Result<PathBuf>) -> PathBuf {
    cwd.unwrap_or_else(|err| {
        log::warn!("Failed to get current directory, paths stay absolute: {}", err);
        PathBuf::new()
    })
}

/// Iterator stage that logs every file it yields.
pub struct LogFiles<I, S: LineSink> {
    inner: I,
    logger: Logger<S>,
    finished: bool,
}

impl<I, S: LineSink> LogFiles<I, S> {
    pub fn logger(&self) -> &Logger<S> {
        &self.logger
    }

    pub fn into_logger(self) -> Logger<S> {
        self.logger
    }
}

impl<I, S> Iterator for LogFiles<I, S>
where
    I: Iterator<Item = FileRecord>,
    S: LineSink,
{
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            Some(file) => Some(self.logger.on_item(file)),
            None => {
                self.finished = true;
                self.logger.on_complete();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl<I, S> std::iter::FusedIterator for LogFiles<I, S>
where
    I: Iterator<Item = FileRecord>,
    S: LineSink,
{
}

pub trait LogFilesExt: Iterator<Item = FileRecord> + Sized {
    fn log_files<S: LineSink>(self, logger: Logger<S>) -> LogFiles<Self, S> {
        LogFiles {
            inner: self,
            logger,
            finished: false,
        }
    }
}

impl<I: Iterator<Item = FileRecord>> LogFilesExt for I {}
