//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`THEMEWRIGHT_API_KEY`, `THEMEWRIGHT_BASE_URL`,
//!    `THEMEWRIGHT_MODEL`, `THEMEWRIGHT_API_TIMEOUT_SECS`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./themewright.toml in the current directory
//! 4. $XDG_CONFIG_HOME/themewright/themewright.toml (or
//!    ~/.config/themewright/themewright.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod defaults;
mod types;

use defaults::DEFAULT_CONFIG_TEMPLATE;
pub use types::{
    ApiConfig, CatalogConfig, Config, DisplayConfig, GlobalConfigInitResult, LoggingConfig,
    PromptConfig, ServerConfig, WidgetConfig,
};

const CONFIG_FILE_NAME: &str = "themewright.toml";
const CONFIG_DIR_NAME: &str = "themewright";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Where the loaded TOML came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local,
    Global(PathBuf),
    BuiltInDefaults,
}

/// Configuration payload plus the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    resolve_api_key(&mut config, &env_lookup);
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(LoadedConfig { config, source })
}

fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((text, ConfigSource::Local));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

fn resolve_api_key<FEnv>(config: &mut Config, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = env_lookup("THEMEWRIGHT_API_KEY") {
        config.api.api_key = key.trim().to_string();
        return;
    }
    if let Some(env_name) = normalized_option(&config.api.api_key_env) {
        config.api.api_key = env_lookup(&env_name).unwrap_or_default().trim().to_string();
        return;
    }
    config.api.api_key = config.api.api_key.trim().to_string();
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = env_lookup("THEMEWRIGHT_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(model) = env_lookup("THEMEWRIGHT_MODEL") {
        config.api.model = model;
    }
    if let Some(timeout) = env_lookup("THEMEWRIGHT_API_TIMEOUT_SECS") {
        let parsed = timeout.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid THEMEWRIGHT_API_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed.max(1);
    }
    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
    }
    if config.api.model.trim().is_empty() {
        return Err(ConfigError::Invalid("api.model must not be empty".to_string()));
    }
    if config.widget.config_target.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "widget.config_target must not be empty".to_string(),
        ));
    }
    if let Some(setting) = config.widget.baseline.iter().find(|s| s.name.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "widget.baseline contains an entry with an empty name (value {})",
            setting.value
        )));
    }
    Ok(())
}

fn normalized_option(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn config_root_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Return the default per-user config path.
pub fn default_global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Write the embedded template to the per-user config path.
///
/// Without `force`, an existing file is left alone. With `force`, the
/// existing file is first copied to a timestamped backup.
pub fn initialize_default_global_config(
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    let path = default_global_config_path().ok_or_else(|| {
        ConfigError::Invalid("unable to resolve a per-user config directory".to_string())
    })?;
    initialize_config_at_path(&path, force)
}

fn initialize_config_at_path(
    path: &Path,
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        if !force {
            return Ok(GlobalConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let backup_path = timestamped_backup_path(path);
        std::fs::copy(path, &backup_path)?;
        std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        return Ok(GlobalConfigInitResult::Overwritten {
            path: path.to_path_buf(),
            backup_path,
        });
    }

    // create_new avoids clobbering if another process wins a race to create.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())?;
            Ok(GlobalConfigInitResult::Created {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(GlobalConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

fn timestamped_backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    (0..1000usize)
        .map(|suffix| {
            if suffix == 0 {
                path.with_file_name(format!("{file_name}.{timestamp}.bak"))
            } else {
                path.with_file_name(format!("{file_name}.{timestamp}.{suffix}.bak"))
            }
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| {
            path.with_file_name(format!(
                "{file_name}.{timestamp}.{}.bak",
                std::process::id()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;
    use crate::theme::{ConfigSetting, ConfigValue};
    use std::collections::HashMap;

    fn files(entries: &[(&str, &str)]) -> HashMap<PathBuf, String> {
        entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect()
    }

    fn load_with(
        path_override: Option<&str>,
        files: &HashMap<PathBuf, String>,
        env: &[(&str, &str)],
    ) -> Result<LoadedConfig, ConfigError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override,
            |path| {
                files.get(path).cloned().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing fixture")
                })
            },
            |name| env.get(name).cloned(),
            || Some(PathBuf::from("/cfg")),
        )
    }

    #[test]
    fn defaults_when_no_file_exists() {
        let loaded = load_with(None, &HashMap::new(), &[]).unwrap();
        assert_eq!(loaded.source, ConfigSource::BuiltInDefaults);
        let config = loaded.config;
        assert_eq!(config.api.base_url, "https://api.openai.com/v1");
        assert_eq!(config.widget.scope_selector, ":root");
        assert_eq!(config.widget.config_target, "gantt");
        assert_eq!(config.widget.baseline.len(), 4);
        assert!(config.display.color);
    }

    #[test]
    fn local_file_wins_over_global() {
        let files = files(&[
            ("themewright.toml", "[api]\nmodel = \"local\"\n"),
            ("/cfg/themewright/themewright.toml", "[api]\nmodel = \"global\"\n"),
        ]);
        let loaded = load_with(None, &files, &[]).unwrap();
        assert_eq!(loaded.source, ConfigSource::Local);
        assert_eq!(loaded.config.api.model, "local");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let files = files(&[("/cfg/themewright/themewright.toml", "[api]\nmodel = \"global\"\n")]);
        let loaded = load_with(None, &files, &[]).unwrap();
        assert!(matches!(loaded.source, ConfigSource::Global(_)));
        assert_eq!(loaded.config.api.model, "global");
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_with(Some("/nope.toml"), &HashMap::new(), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let files = files(&[(
            "custom.toml",
            "[api]\nbase_url = \"http://file\"\nmodel = \"file\"\napi_key = \"file-key\"\n",
        )]);
        let loaded = load_with(
            Some("custom.toml"),
            &files,
            &[
                ("THEMEWRIGHT_BASE_URL", "http://env"),
                ("THEMEWRIGHT_MODEL", "env-model"),
                ("THEMEWRIGHT_API_KEY", " env-key "),
                ("THEMEWRIGHT_API_TIMEOUT_SECS", "0"),
            ],
        )
        .unwrap();
        let api = loaded.config.api;
        assert_eq!(api.base_url, "http://env");
        assert_eq!(api.model, "env-model");
        assert_eq!(api.api_key, "env-key");
        assert_eq!(api.timeout_secs, 1);
    }

    #[test]
    fn api_key_env_indirection() {
        let files = files(&[(
            "themewright.toml",
            "[api]\napi_key = \"literal\"\napi_key_env = \"MY_KEY\"\n",
        )]);
        let loaded = load_with(None, &files, &[("MY_KEY", "from-env")]).unwrap();
        assert_eq!(loaded.config.api.api_key, "from-env");
    }

    #[test]
    fn invalid_timeout_env_is_rejected() {
        let err = load_with(None, &HashMap::new(), &[("THEMEWRIGHT_API_TIMEOUT_SECS", "soon")])
            .unwrap_err();
        assert!(err.to_string().contains("THEMEWRIGHT_API_TIMEOUT_SECS"));
    }

    #[test]
    fn baseline_parses_numbers_and_booleans() {
        let files = files(&[(
            "themewright.toml",
            "[[widget.baseline]]\nname = \"row_height\"\nvalue = 40\n\n[[widget.baseline]]\nname = \"show_progress\"\nvalue = false\n",
        )]);
        let config = load_with(None, &files, &[]).unwrap().config;
        assert_eq!(
            config.widget.baseline,
            vec![
                ConfigSetting::new("row_height", 40),
                ConfigSetting::new("show_progress", false),
            ]
        );
        let snapshot = config.widget.baseline_snapshot();
        assert_eq!(
            snapshot.get("show_progress"),
            Some(&ConfigValue::Bool(false))
        );
    }

    #[test]
    fn empty_model_is_invalid() {
        let files = files(&[("themewright.toml", "[api]\nmodel = \"  \"\n")]);
        let err = load_with(None, &files, &[]).unwrap_err();
        assert!(err.to_string().contains("api.model"));
    }

    #[test]
    fn embedded_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.api.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.widget.baseline.len(), 4);
    }

    #[test]
    fn init_creates_then_backs_up_on_force() {
        let dir = TestTempDir::new("config-init");
        let path = dir.child("themewright/themewright.toml");

        let created = initialize_config_at_path(&path, false).unwrap();
        assert!(matches!(created, GlobalConfigInitResult::Created { .. }));

        let again = initialize_config_at_path(&path, false).unwrap();
        assert!(matches!(again, GlobalConfigInitResult::AlreadyInitialized { .. }));

        std::fs::write(&path, "# edited\n").unwrap();
        let overwritten = initialize_config_at_path(&path, true).unwrap();
        let GlobalConfigInitResult::Overwritten { backup_path, .. } = overwritten else {
            panic!("expected overwrite, got {overwritten:?}");
        };
        assert_eq!(std::fs::read_to_string(backup_path).unwrap(), "# edited\n");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            DEFAULT_CONFIG_TEMPLATE
        );
    }
}
