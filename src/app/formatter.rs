use crate::app::models::FileStat;
use chrono::NaiveTime;
use owo_colors::OwoColorize;
use std::path::Path;

const BYTE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Continuation indent for the stat section, lines up under `stat:  `.
const STAT_INDENT: &str = "       ";

/// Replaces the home directory prefix with `~`.
pub fn tildify(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display());
        }
    }
    path.display().to_string()
}

/// Human readable byte count using SI units and three significant digits.
pub fn pretty_bytes(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let rendered = if value >= 100.0 {
        format!("{:.0}", value)
    } else if value >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    };

    format!("{} {}", trim_zeros(&rendered), BYTE_UNITS[unit])
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

pub fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}

/// Number of decimal digits needed to print `n`.
pub fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Dumps stat metadata as `key = value` lines.
pub fn stat_dump(stat: &FileStat) -> String {
    let body = match toml::to_string(stat) {
        Ok(body) => body,
        Err(err) => {
            log::debug!("Falling back to debug stat output: {}", err);
            format!("{:?}", stat)
        }
    };

    body.trim()
        .lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{}", STAT_INDENT))
}

/// Console line as printed by the binary: `[HH:MM:SS] message`.
pub fn log_line(time: NaiveTime, message: &str) -> String {
    format!("[{}] {}", time.format("%H:%M:%S"), message)
}

/// Terminal colors, switched off for plain sinks.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn prop(&self, text: &str) -> String {
        self.paint(text, |t| t.magenta().to_string())
    }

    pub fn size(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().to_string())
    }

    pub fn count(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn edit(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn delete(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    fn paint(&self, text: &str, f: impl Fn(&str) -> String) -> String {
        if self.enabled {
            f(text)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_bytes_small_values() {
        assert_eq!(pretty_bytes(0), "0 B");
        assert_eq!(pretty_bytes(12), "12 B");
        assert_eq!(pretty_bytes(999), "999 B");
    }

    #[test]
    fn pretty_bytes_scales_units() {
        assert_eq!(pretty_bytes(1000), "1 kB");
        assert_eq!(pretty_bytes(1234), "1.23 kB");
        assert_eq!(pretty_bytes(15_500), "15.5 kB");
        assert_eq!(pretty_bytes(123_456), "123 kB");
        assert_eq!(pretty_bytes(2_000_000), "2 MB");
        assert_eq!(pretty_bytes(3_210_000_000), "3.21 GB");
    }

    #[test]
    fn pluralize_is_singular_only_for_one() {
        assert_eq!(pluralize("item", 0), "items");
        assert_eq!(pluralize("item", 1), "item");
        assert_eq!(pluralize("item", 2), "items");
        assert_eq!(pluralize("item", 5), "items");
    }

    #[test]
    fn digits_counts_columns() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(100), 3);
    }

    #[test]
    fn tildify_shortens_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(tildify(&home), "~");
        let nested = home.join("project").join("a.rs");
        assert!(tildify(&nested).starts_with('~'));
        if home != Path::new("/") {
            assert_eq!(
                tildify(Path::new("/definitely/not/home")),
                "/definitely/not/home"
            );
        }
    }

    #[test]
    fn stat_dump_indents_continuation_lines() {
        let stat = FileStat {
            size: 12,
            is_file: true,
            ..FileStat::default()
        };
        let dump = stat_dump(&stat);
        assert!(dump.starts_with("size = 12"));
        assert!(dump.contains("\n       is_file = true"));
        assert!(!dump.contains("mtime_ms"));
    }

    #[test]
    fn log_line_uses_clock_time() {
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        assert_eq!(
            log_line(time, "          ┌── log"),
            "[09:05:03]           ┌── log"
        );
        let late = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(log_line(late, "x"), "[23:59:59] x");
    }

    #[test]
    fn palette_disabled_is_plain() {
        let palette = Palette::new(false);
        assert_eq!(palette.prop("src/a.rs"), "src/a.rs");
        assert_ne!(Palette::new(true).count("1"), "1");
    }
}
