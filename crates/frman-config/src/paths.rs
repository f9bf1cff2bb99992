use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "FRMAN_CONFIG";

/// Config location used when neither `--config` nor `FRMAN_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yml";

pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
