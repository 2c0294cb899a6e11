use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FRAMES: [&str; 16] = [
    "[    ]", "[=   ]", "[==  ]", "[=== ]", "[====]", "[ ===]", "[  ==]", "[   =]",
    "[    ]", "[   =]", "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]",
];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Progress indicator shown while a run is active.
pub trait Loader {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Bouncing bar drawn on stderr from a background thread.
#[derive(Default)]
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loader for Spinner {
    fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        self.handle = Some(thread::spawn(move || {
            let mut stderr = io::stderr();
            let mut frame = 0;
            while running.load(Ordering::SeqCst) {
                let _ = write!(stderr, "\r{}", FRAMES[frame].green());
                let _ = stderr.flush();
                frame = (frame + 1) % FRAMES.len();
                thread::sleep(FRAME_INTERVAL);
            }
            // Clear the spinner line.
            let _ = write!(stderr, "\r{}\r", " ".repeat(FRAMES[0].len()));
            let _ = stderr.flush();
        }));
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Spinner thread panicked");
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_bounce_without_repeats() {
        assert_eq!(FRAMES[4], "[====]");
        assert_eq!(FRAMES[12], "[====]");
        for i in 0..FRAMES.len() {
            assert_ne!(FRAMES[i], FRAMES[(i + 1) % FRAMES.len()]);
        }
    }

    #[test]
    fn spinner_stops_cleanly() {
        let mut spinner = Spinner::new();
        spinner.start();
        spinner.start();
        spinner.stop();
        assert!(spinner.handle.is_none());
        spinner.stop();
    }
}
