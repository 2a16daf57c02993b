//! Abstract interface to the platform BLE stack.
//!
//! The connection manager never talks to a concrete stack directly: it issues
//! commands through [`BleAdapter`] / [`GattLink`] and receives the platform's
//! asynchronous callbacks as [`AdapterEvent`]s pushed into an [`EventSink`].
//! An adapter implementation wraps whatever the platform provides (a system
//! Bluetooth API, a test double) behind these traits.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::BleError;

pub mod gatt;

pub use gatt::{Characteristic, CharacteristicProperties, Descriptor, GattStatus, LinkState, Service};

/// A single advertisement seen while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub address: String,
    pub local_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    LowPower,
    Balanced,
    LowLatency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub mode: ScanMode,
}

impl ScanSettings {
    pub fn low_latency() -> Self {
        ScanSettings { mode: ScanMode::LowLatency }
    }
}

/// Transport hint passed to the low-level connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Auto,
    Le,
}

/// A callback delivered by the platform stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    ScanResult(Advertisement),
    ConnectionStateChange {
        status: GattStatus,
        state: LinkState,
    },
    ServicesDiscovered {
        status: GattStatus,
        services: Vec<Service>,
    },
    MtuChanged {
        status: GattStatus,
        mtu: u16,
    },
    CharacteristicChanged {
        characteristic: Uuid,
        value: Vec<u8>,
    },
}

/// Handle through which an adapter delivers its callbacks.
///
/// `deliver` may be invoked from any thread; the receiving side serializes
/// internally. It must not be invoked re-entrantly from within an adapter
/// command call on the same thread.
#[derive(Clone)]
pub struct EventSink {
    handler: Arc<dyn Fn(AdapterEvent) + Send + Sync>,
}

impl EventSink {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(AdapterEvent) + Send + Sync + 'static,
    {
        EventSink { handler: Arc::new(handler) }
    }

    pub fn deliver(&self, event: AdapterEvent) {
        (self.handler)(event);
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Central-role scan/connect commands of the platform stack.
pub trait BleAdapter: Send + Sync {
    /// Begin scanning; advertisements arrive as [`AdapterEvent::ScanResult`].
    fn start_scan(&self, settings: ScanSettings, sink: EventSink) -> Result<(), BleError>;

    fn stop_scan(&self);

    /// Issue a low-level connect request. Connection progress arrives
    /// asynchronously through the sink; the returned link only carries the
    /// commands that operate on the pending connection.
    fn connect(
        &self,
        address: &str,
        transport: Transport,
        sink: EventSink,
    ) -> Result<Arc<dyn GattLink>, BleError>;
}

/// Commands on an established (or pending) GATT connection.
pub trait GattLink: Send + Sync {
    fn discover_services(&self) -> Result<(), BleError>;

    fn request_mtu(&self, mtu: u16) -> Result<(), BleError>;

    fn set_characteristic_notification(
        &self,
        characteristic: Uuid,
        enabled: bool,
    ) -> Result<(), BleError>;

    fn write_descriptor(
        &self,
        characteristic: Uuid,
        descriptor: Uuid,
        value: &[u8],
    ) -> Result<(), BleError>;

    /// Resume the existing link without a new scan.
    fn connect(&self) -> Result<(), BleError>;

    fn disconnect(&self) -> Result<(), BleError>;

    /// Release the platform handle. No further commands are valid afterwards.
    fn close(&self);
}
