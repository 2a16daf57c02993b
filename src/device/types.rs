use uuid::Uuid;

/// Connection state as observed by downstream consumers, carried inside
/// [`Event::Success`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Initializing,
    Connected,
    Disconnected,
}

/// Payload of a [`Event::Success`] emission. `value` is set only for
/// steady-state characteristic notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub connection_state: ConnectionState,
    pub value: Option<Vec<u8>>,
}

impl DeviceUpdate {
    pub fn state(connection_state: ConnectionState) -> Self {
        DeviceUpdate { connection_state, value: None }
    }

    pub fn notification(value: Vec<u8>) -> Self {
        DeviceUpdate {
            connection_state: ConnectionState::Connected,
            value: Some(value),
        }
    }
}

/// What the manager publishes on its broadcast channel. There is no replay:
/// a subscriber only sees events emitted after it subscribed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Loading(String),
    Success(DeviceUpdate),
    Error(String),
}

/// The single peripheral this manager receives from. Immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub device_address: String,
    pub service_uuid: Uuid,
    pub characteristic_uuid: Uuid,
    pub cccd_uuid: Uuid,
    pub requested_mtu: u16,
    pub max_connection_attempts: u32,
}

impl Target {
    /// Advertisement addresses compare case-insensitively; platforms disagree
    /// on the casing of hex digits.
    pub fn matches_address(&self, address: &str) -> bool {
        self.device_address.eq_ignore_ascii_case(address)
    }
}
