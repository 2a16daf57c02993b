use std::path::{Path, PathBuf};
use std::str;

use directories_next::ProjectDirs;
use log::info;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::config::types::ReceiverConfig;
use crate::error::ConfigError;

// ble-receive.json in an os dependent standard directory, such as %AppData% on
// windows.
fn get_config_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("", "", "ble-receive") {
        None => Err(ConfigError::NoConfigPath),
        Some(dirs) => Ok(dirs.config_dir().join("ble-receive.json")),
    }
}

pub async fn read_config_from(path: &Path) -> Result<ReceiverConfig, ConfigError> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("No config file at {}; using defaults", path.to_string_lossy());
            return Ok(ReceiverConfig::default());
        },
        Err(err) => return Err(err.into()),
    };

    let mut content = vec![];
    file.read_to_end(&mut content).await?;

    if content.is_empty() {
        return Ok(ReceiverConfig::default());
    }

    let content = str::from_utf8(&content)?;
    let config: ReceiverConfig = serde_json::from_str(content)?;
    Ok(config)
}

pub async fn read_config() -> Result<ReceiverConfig, ConfigError> {
    let path = get_config_path()?;
    info!("Using config file {}", path.to_string_lossy());
    read_config_from(&path).await
}
