use uuid::Uuid;

/// Raw status byte reported by the platform stack alongside a GATT callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattStatus(pub u8);

impl GattStatus {
    pub const SUCCESS: GattStatus = GattStatus(0x00);

    pub fn is_success(&self) -> bool {
        *self == GattStatus::SUCCESS
    }
}

impl From<u8> for GattStatus {
    fn from(raw: u8) -> Self {
        GattStatus(raw)
    }
}

/// Low-level link state reported by a connection-state-change callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacteristicProperties {
    pub notify: bool,
    pub indicate: bool,
}

impl CharacteristicProperties {
    pub fn is_notifiable(&self) -> bool {
        self.notify
    }

    pub fn is_indicatable(&self) -> bool {
        self.indicate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    pub uuid: Uuid,
    pub properties: CharacteristicProperties,
    pub descriptors: Vec<Descriptor>,
}

impl Characteristic {
    pub fn descriptor(&self, uuid: &Uuid) -> Option<&Descriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.uuid.eq(uuid))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub uuid: Uuid,
    pub characteristics: Vec<Characteristic>,
}
