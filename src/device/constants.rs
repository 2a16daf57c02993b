use uuid::Uuid;

/**
 * Address of the peripheral to receive from, unless overridden by config.
 */
pub const DEFAULT_DEVICE_ADDRESS: &str = "B0:A7:32:2A:AE:9A";

/**
 * The UUID of the GATT service holding the data characteristic.
 */
pub const DEFAULT_SERVICE_UUID: &str = "eee7aa7e-ef6f-4c28-ac62-2187e74e0b6b";

/**
 * The UUID of the GATT characteristic that pushes notifications.
 */
pub const DEFAULT_CHARACTERISTIC_UUID: &str = "eee7aa7e-ef6f-4c28-ac62-2187e74e0b6b";

/**
 * The Client Characteristic Configuration Descriptor (Bluetooth assigned number).
 */
pub const DEFAULT_CCCD_UUID: &str = "00002902-0000-1000-8000-00805f9b34fb";

/**
 * MTU requested after service discovery. 517 is the ATT maximum; the
 * peripheral may grant less.
 */
pub const REQUESTED_MTU: u16 = 517;

/**
 * How many low-level connect failures to tolerate before giving up.
 */
pub const MAX_CONNECTION_ATTEMPTS: u32 = 5;

/**
 * Capacity of the broadcast event channel. Producers never block; a reader
 * lagging behind this many events loses the oldest ones.
 */
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

pub const ENABLE_NOTIFICATION_VALUE: [u8; 2] = [0x01, 0x00];
pub const ENABLE_INDICATION_VALUE: [u8; 2] = [0x02, 0x00];
pub const DISABLE_NOTIFICATION_VALUE: [u8; 2] = [0x00, 0x00];

pub fn make_default_service_uuid() -> Uuid {
    Uuid::parse_str(DEFAULT_SERVICE_UUID).unwrap()
}

pub fn make_default_characteristic_uuid() -> Uuid {
    Uuid::parse_str(DEFAULT_CHARACTERISTIC_UUID).unwrap()
}

pub fn make_cccd_uuid() -> Uuid {
    Uuid::parse_str(DEFAULT_CCCD_UUID).unwrap()
}
