use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::constants::{
    DEFAULT_CCCD_UUID, DEFAULT_CHARACTERISTIC_UUID, DEFAULT_DEVICE_ADDRESS, DEFAULT_SERVICE_UUID,
    MAX_CONNECTION_ATTEMPTS, REQUESTED_MTU,
};
use crate::device::types::Target;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiverConfig {
    pub device_address: String,
    pub service_uuid: String,
    pub characteristic_uuid: String,
    pub cccd_uuid: String,
    pub requested_mtu: u16,
    pub max_connection_attempts: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            device_address: String::from(DEFAULT_DEVICE_ADDRESS),
            service_uuid: String::from(DEFAULT_SERVICE_UUID),
            characteristic_uuid: String::from(DEFAULT_CHARACTERISTIC_UUID),
            cccd_uuid: String::from(DEFAULT_CCCD_UUID),
            requested_mtu: REQUESTED_MTU,
            max_connection_attempts: MAX_CONNECTION_ATTEMPTS,
        }
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, ConfigError> {
    Uuid::parse_str(value).map_err(|source| ConfigError::InvalidUuid {
        value: value.to_string(),
        source,
    })
}

impl TryFrom<&ReceiverConfig> for Target {
    type Error = ConfigError;

    fn try_from(config: &ReceiverConfig) -> Result<Self, Self::Error> {
        Ok(Target {
            device_address: config.device_address.clone(),
            service_uuid: parse_uuid(&config.service_uuid)?,
            characteristic_uuid: parse_uuid(&config.characteristic_uuid)?,
            cccd_uuid: parse_uuid(&config.cccd_uuid)?,
            requested_mtu: config.requested_mtu,
            max_connection_attempts: config.max_connection_attempts,
        })
    }
}
