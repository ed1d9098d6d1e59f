use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parla_config::Config;
use serde::{Deserialize, Serialize};

/// Per-user config folder, falls back to the working directory
fn parla_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parla")
}

pub fn profiles_dir() -> PathBuf {
    parla_root().join("profiles")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Read a bare config file (no profile wrapper)
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// `config.json` in the working directory, or built-in defaults
fn load_repo_default_config() -> Config {
    let path = Path::new("config.json");
    if path.exists() {
        match load_config_file(path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Ignoring repo default config: {:#}", e),
        }
    }
    Config::new()
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let profile: Profile =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(profile.value)
}

fn write_profile(path: &Path, name: &str, value: Config) -> anyhow::Result<()> {
    let profile = Profile {
        name: name.into(),
        value,
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Initialize user config folders and main profile if missing
pub fn init_user_config() -> anyhow::Result<()> {
    init_in(&profiles_dir())
}

fn init_in(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    let main_profile = dir.join("main.json");
    if !main_profile.exists() {
        write_profile(&main_profile, "main", load_repo_default_config())?;
        tracing::info!("Created main profile in {}", dir.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    load_from(&profiles_dir(), name)
}

fn load_from(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = dir.join(format!("{name}.json"));
    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or repo default");
    let main_file = dir.join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(load_repo_default_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_main_profile_once() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("profiles");

        init_in(&profiles).unwrap();
        let main = profiles.join("main.json");
        assert!(main.exists());

        let mut config = read_profile(&main).unwrap();
        config.session.from_lang = "fr-FR".into();
        write_profile(&main, "main", config).unwrap();

        // A second init must not clobber user edits
        init_in(&profiles).unwrap();
        assert_eq!(read_profile(&main).unwrap().session.from_lang, "fr-FR");
    }

    #[test]
    fn unknown_profile_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.to_lang = "ja-JP".into();
        write_profile(&dir.path().join("main.json"), "main", config).unwrap();

        let loaded = load_from(dir.path(), "travel").unwrap();
        assert_eq!(loaded.session.to_lang, "ja-JP");
    }

    #[test]
    fn config_file_accepts_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parla.json");
        fs::write(&path, r#"{ "session": { "from_lang": "es-ES" } }"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.session.from_lang, "es-ES");
        assert_eq!(config.session.to_lang, "en-US");
        assert!(config.translator.enabled);
    }

    #[test]
    fn config_file_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_config_file(&path).is_err());
    }
}
