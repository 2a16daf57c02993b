use std::sync::Arc;

use log::{debug, warn};
use uuid::Uuid;

use crate::adapter::{Characteristic, CharacteristicProperties, GattLink, Service};
use crate::device::constants::{
    DISABLE_NOTIFICATION_VALUE, ENABLE_INDICATION_VALUE, ENABLE_NOTIFICATION_VALUE,
};
use crate::device::types::Target;
use crate::error::BleError;

/// CCCD payload for enabling updates on a characteristic. Indication is
/// preferred when the peripheral supports both, `None` when it supports
/// neither.
pub fn notification_payload(properties: &CharacteristicProperties) -> Option<[u8; 2]> {
    if properties.is_indicatable() {
        Some(ENABLE_INDICATION_VALUE)
    } else if properties.is_notifiable() {
        Some(ENABLE_NOTIFICATION_VALUE)
    } else {
        None
    }
}

/// The live connection to the peripheral: the low-level link plus everything
/// negotiated on top of it. At most one exists at a time; it is dropped when
/// the link is closed.
pub struct Session {
    link: Arc<dyn GattLink>,
    services: Vec<Service>,
    mtu: Option<u16>,
    subscribed: Option<Uuid>,
}

impl Session {
    pub fn new(link: Arc<dyn GattLink>) -> Self {
        Session {
            link,
            services: vec![],
            mtu: None,
            subscribed: None,
        }
    }

    pub fn link(&self) -> &Arc<dyn GattLink> {
        &self.link
    }

    pub fn set_services(&mut self, services: Vec<Service>) {
        self.services = services;
    }

    pub fn set_mtu(&mut self, mtu: u16) {
        self.mtu = Some(mtu);
    }

    pub fn mtu(&self) -> Option<u16> {
        self.mtu
    }

    pub fn subscribed(&self) -> Option<&Uuid> {
        self.subscribed.as_ref()
    }

    pub fn find_characteristic(&self, target: &Target) -> Option<&Characteristic> {
        self.services
            .iter()
            .find(|service| service.uuid.eq(&target.service_uuid))?
            .characteristics
            .iter()
            .find(|characteristic| characteristic.uuid.eq(&target.characteristic_uuid))
    }

    /// Enable notifications on the target characteristic by writing its CCCD.
    /// Silently skips when the characteristic supports neither delivery mode
    /// or carries no CCCD.
    pub fn enable_notifications(&mut self, target: &Target) -> Result<(), BleError> {
        let characteristic = match self.find_characteristic(target) {
            Some(characteristic) => characteristic.clone(),
            None => return Err(BleError::MissingCharacteristic),
        };

        let payload = match notification_payload(&characteristic.properties) {
            Some(payload) => payload,
            None => {
                warn!(
                    "Characteristic {} supports neither notification nor indication",
                    characteristic.uuid
                );
                return Ok(());
            },
        };

        if characteristic.descriptor(&target.cccd_uuid).is_none() {
            warn!("Characteristic {} has no CCCD", characteristic.uuid);
            return Ok(());
        }

        self.link.set_characteristic_notification(characteristic.uuid, true)?;
        self.link.write_descriptor(characteristic.uuid, target.cccd_uuid, &payload)?;

        debug!("Subscribed to characteristic {}", characteristic.uuid);
        self.subscribed = Some(characteristic.uuid);
        Ok(())
    }

    /// Best-effort disable on teardown; failures are logged, never surfaced.
    pub fn disable_notifications(&self, target: &Target) {
        let characteristic = match self.find_characteristic(target) {
            Some(characteristic) => characteristic,
            None => return,
        };

        if characteristic.descriptor(&target.cccd_uuid).is_none() {
            return;
        }

        if let Err(err) = self.link.set_characteristic_notification(characteristic.uuid, false) {
            warn!("Failed to clear characteristic notification: {}", err);
        }

        if let Err(err) = self.link.write_descriptor(
            characteristic.uuid,
            target.cccd_uuid,
            &DISABLE_NOTIFICATION_VALUE,
        ) {
            warn!("Failed to write CCCD disable value: {}", err);
        }
    }

    pub fn close(self) {
        self.link.close();
    }
}
