//! `gradebook config` handler
//!
//! Works on the configuration as stored on disk. Command-line overrides are
//! applied to a separate per-run copy in `main`, so nothing passed with
//! `--token`/`--endpoint`/`--reports-dir` ends up in the file.

use crate::args::ConfigSubcommand;
use gradebook_analytics::config::Config;
use gradebook_analytics::info;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Keys listed by `config get`, in file order
const KEYS: [&str; 12] = [
    "level",
    "file",
    "verbose",
    "endpoint",
    "token",
    "timeout_secs",
    "reports_dir",
    "exports_dir",
    "format",
    "chart_width",
    "chart_height",
    "pdf_converter",
];

/// Dispatch config subcommands against the stored configuration
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    stored: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    let path = Config::get_config_file_path();
    match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => {
            print_all(stored, &path);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => {
            println!("{}", describe(stored, &key)?);
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => {
            let line = set_and_save(stored, &key, &value, &path)?;
            println!("✓ {line}");
            Ok(())
        }
        Some(ConfigSubcommand::Unset { key }) => {
            let line = unset_and_save(stored, defaults, &key, &path)?;
            println!("✓ {line}");
            Ok(())
        }
        Some(ConfigSubcommand::Reset) => reset(&path, io::stdin().lock()),
    }
}

fn print_all(config: &Config, path: &Path) {
    println!("# {}\n", path.display());
    print!("{config}");
}

/// `api.token = ****abcd` style line for one key
fn describe(config: &Config, key: &str) -> Result<String, String> {
    let (Some(path), Some(value)) = (Config::key_path(key), config.display_value(key)) else {
        return Err(format!(
            "✗ Unknown config key: '{key}' (known keys: {})",
            KEYS.join(", ")
        ));
    };
    Ok(format!("{path} = {value}"))
}

/// Set `key`, persist to `path` and return the confirmation line
fn set_and_save(config: &mut Config, key: &str, value: &str, path: &Path) -> Result<String, String> {
    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    config
        .save_to(path)
        .map_err(|e| format!("✗ Failed to save {}: {e}", path.display()))?;
    info!("Updated {} in {}", Config::key_path(key).unwrap_or(key), path.display());
    describe(config, key)
}

/// Restore `key` to its default, persist to `path` and return the confirmation line
fn unset_and_save(
    config: &mut Config,
    defaults: &Config,
    key: &str,
    path: &Path,
) -> Result<String, String> {
    config.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    config
        .save_to(path)
        .map_err(|e| format!("✗ Failed to save {}: {e}", path.display()))?;
    Ok(format!("{} (default)", describe(config, key)?))
}

/// Delete the config file after a y/yes answer on `input`
fn reset(path: &Path, mut input: impl BufRead) -> Result<(), String> {
    if !path.exists() {
        println!("✓ No config file at {}, already using defaults", path.display());
        return Ok(());
    }

    print!("Delete {} and return to defaults? (y/n): ", path.display());
    io::stdout().flush().ok();

    let mut answer = String::new();
    input.read_line(&mut answer).ok();
    if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        println!("✗ Reset cancelled");
        return Ok(());
    }

    Config::reset_at(path).map_err(|e| format!("✗ Failed to remove {}: {e}", path.display()))?;
    println!("✓ Config reset to defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_analytics::config::ConfigOverrides;
    use std::fs;

    #[test]
    fn test_set_does_not_persist_run_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut stored = Config::from_defaults();
        let mut run_config = stored.clone();
        run_config.apply_overrides(&ConfigOverrides {
            token: Some("SECRET-FROM-CLI".to_string()),
            endpoint: Some("http://override.example".to_string()),
            reports_dir: Some("/tmp/override".to_string()),
            ..Default::default()
        });

        set_and_save(&mut stored, "level", "debug", &path).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("level = \"debug\""));
        assert!(!saved.contains("SECRET-FROM-CLI"));
        assert!(!saved.contains("override.example"));
        assert!(!saved.contains("/tmp/override"));
        assert_eq!(run_config.api.token, "SECRET-FROM-CLI");
    }

    #[test]
    fn test_describe_masks_token_and_shows_key_path() {
        let mut config = Config::from_defaults();
        config.api.token = "tok-123456".to_string();
        config.report.pdf_converter.clear();

        assert_eq!(describe(&config, "token").unwrap(), "api.token = ******3456");
        assert_eq!(describe(&config, "pdf-converter").unwrap(), "report.pdf_converter = (unset)");
        assert!(describe(&config, "colour").unwrap_err().contains("known keys"));
    }

    #[test]
    fn test_set_rejects_bad_value_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::from_defaults();

        assert!(set_and_save(&mut config, "chart_width", "100000", &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_unset_restores_and_saves_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let defaults = Config::from_defaults();
        let mut config = defaults.clone();
        config.set("timeout_secs", "90").unwrap();

        let line = unset_and_save(&mut config, &defaults, "timeout-secs", &path).unwrap();
        assert_eq!(line, format!("api.timeout_secs = {} (default)", defaults.api.timeout_secs));
        let saved = Config::from_toml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.api.timeout_secs, defaults.api.timeout_secs);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::from_defaults().save_to(&path).unwrap();

        reset(&path, "n\n".as_bytes()).unwrap();
        assert!(path.exists());

        reset(&path, "YES\n".as_bytes()).unwrap();
        assert!(!path.exists());

        reset(&path, "".as_bytes()).unwrap();
    }
}
