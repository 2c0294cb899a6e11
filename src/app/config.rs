use crate::app::cli::Cli;
use crate::app::models::{LoggerOptions, RuntimeConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct PresetConfig {
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    action: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    minimal: Option<bool>,
    show_files: Option<bool>,
    loader: Option<bool>,
}

fn presets_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("file_logger")
            .join("presets.toml")
    })
}

fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read config at {:?}", path))?;

    let parsed: PresetsFile = toml::from_str(&content).context("Failed to parse presets.toml")?;

    Ok(parsed.presets)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

pub fn resolve_config(cli: Cli, project_name: Option<&str>, cwd: &Path) -> Result<RuntimeConfig> {
    let presets = match presets_path() {
        Some(path) => load_presets_file(&path)?,
        None => HashMap::new(),
    };
    resolve_with_presets(cli, project_name, cwd, &presets)
}

fn resolve_with_presets(
    cli: Cli,
    project_name: Option<&str>,
    cwd: &Path,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > Auto-detect > None
    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();
    log::debug!("Using preset {:?}: {:?}", preset_key, preset);

    let mut options = LoggerOptions {
        color: !cli.no_color,
        ..LoggerOptions::default()
    };

    // Built-in variants only apply when the presets file does not override them.
    match cli.preset.as_deref() {
        Some("edit") if preset.action.is_none() => options = options.edit(),
        Some("clean") if preset.action.is_none() => options = options.clean(),
        Some(name) if !presets.contains_key(name) => {
            anyhow::bail!("Unknown preset '{}'", name)
        }
        _ => {}
    }

    if let Some(action) = cli.action.or(preset.action) {
        options.action = action;
    }
    if let Some(prefix) = cli.prefix.or(preset.prefix) {
        options.prefix = prefix;
    }
    if let Some(suffix) = cli.suffix.or(preset.suffix) {
        options.suffix = suffix;
    }
    if let Some(minimal) = preset.minimal {
        options.minimal = minimal;
    }
    if cli.full {
        options.minimal = false;
    }
    if let Some(show_files) = preset.show_files {
        options.show_files = show_files;
    }
    if cli.count_only {
        options.show_files = false;
    }
    if let Some(loader) = preset.loader {
        options.show_loader = loader;
    }
    if cli.no_loader {
        options.show_loader = false;
    }

    let root = match cli.root {
        Some(root) if root.is_absolute() => root,
        Some(root) => cwd.join(root),
        None => cwd.to_path_buf(),
    };

    Ok(RuntimeConfig {
        root,
        include: merge_vecs(preset.include, cli.include),
        exclude: merge_vecs(preset.exclude, cli.exclude),
        read_contents: !cli.no_contents,
        options: options.with_verbose(cli.verbose),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn presets_from(text: &str) -> HashMap<String, PresetConfig> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        load_presets_file(file.path()).unwrap()
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let presets = load_presets_file(&dir.path().join("presets.toml")).unwrap();
        assert!(presets.is_empty());
    }

    #[test]
    fn bad_presets_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[site]\nunknown = 1\n").unwrap();
        assert!(load_presets_file(file.path()).is_err());
    }

    #[test]
    fn defaults_without_presets() {
        let config =
            resolve_with_presets(Cli::default(), None, Path::new("/work"), &HashMap::new()).unwrap();
        assert_eq!(config.root, PathBuf::from("/work"));
        assert!(config.include.is_empty());
        assert!(config.read_contents);
        assert!(config.options.minimal);
        assert!(config.options.show_files);
        assert!(config.options.show_loader);
        assert!(!config.options.verbose);
    }

    #[test]
    fn project_preset_is_merged_with_cli() {
        let presets = presets_from(
            r#"
            [site]
            include = ["src/**", "docs/**"]
            action = "built"
            show_files = false
            "#,
        );
        let cli = Cli {
            include: Some(vec!["docs/**".into(), "tests/**".into()]),
            suffix: Some("!".into()),
            ..Cli::default()
        };

        let config = resolve_with_presets(cli, Some("site"), Path::new("/work"), &presets).unwrap();
        assert_eq!(config.include, vec!["src/**", "docs/**", "tests/**"]);
        assert_eq!(config.options.action, "built");
        assert_eq!(config.options.suffix, "!");
        assert!(!config.options.show_files);
    }

    #[test]
    fn builtin_edit_preset() {
        let cli = Cli {
            preset: Some("edit".into()),
            no_color: true,
            ..Cli::default()
        };
        let config = resolve_with_presets(cli, None, Path::new("/"), &HashMap::new()).unwrap();
        assert_eq!(config.options.action, "✎");
        assert!(!config.options.color);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let cli = Cli {
            preset: Some("nope".into()),
            ..Cli::default()
        };
        assert!(resolve_with_presets(cli, None, Path::new("/"), &HashMap::new()).is_err());
    }

    #[test]
    fn verbose_flag_overrides_minimal() {
        let presets = presets_from("[site]\nminimal = true\n");
        let cli = Cli {
            verbose: true,
            root: Some("sub".into()),
            ..Cli::default()
        };
        let config = resolve_with_presets(cli, Some("site"), Path::new("/work"), &presets).unwrap();
        assert!(config.options.verbose);
        assert!(!config.options.minimal);
        assert_eq!(config.root, PathBuf::from("/work/sub"));
    }

    #[test]
    fn cli_switches_win() {
        let presets = presets_from("[site]\nloader = true\nshow_files = true\n");
        let cli = Cli {
            no_loader: true,
            count_only: true,
            full: true,
            no_contents: true,
            ..Cli::default()
        };
        let config = resolve_with_presets(cli, Some("site"), Path::new("/"), &presets).unwrap();
        assert!(!config.options.show_loader);
        assert!(!config.options.show_files);
        assert!(!config.options.minimal);
        assert!(!config.read_contents);
    }
}
