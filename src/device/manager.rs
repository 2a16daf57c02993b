use std::sync::{Arc, Mutex, Weak};

use log::{debug, error, info, warn};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::adapter::{
    Advertisement, AdapterEvent, BleAdapter, EventSink, GattStatus, LinkState, ScanSettings,
    Transport,
};
use crate::device::constants::EVENT_CHANNEL_CAPACITY;
use crate::device::session::Session;
use crate::device::types::{ConnectionState, DeviceUpdate, Event, Target};
use crate::error::BleError;

/// Where the state machine currently is in the handshake. The descriptor
/// write that enables notifications completes without a callback, so there is
/// no separate subscribing phase; the machine moves straight to `Relaying`
/// once the write has been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Scanning,
    Connecting,
    DiscoveringServices,
    NegotiatingMtu,
    Relaying,
    Failed,
    Closed,
}

struct Inner {
    target: Target,
    adapter: Arc<dyn BleAdapter>,
    events: broadcast::Sender<Event>,
    phase: Phase,
    scanning: bool,
    attempts: u32,
    session: Option<Session>,
}

/// BLE central-role receive manager.
///
/// Drives a single peripheral through scan, connect, service discovery, MTU
/// negotiation and CCCD subscription, then relays every notification from the
/// target characteristic to the broadcast event stream. All control
/// operations are fire-and-forget; their outcomes arrive on the stream.
///
/// Adapter callbacks may arrive on any thread. Every callback and every
/// control operation takes the same internal lock, so state transitions are
/// serialized and nothing is emitted after [`close_connection`] returns.
///
/// [`close_connection`]: BleReceiveManager::close_connection
pub struct BleReceiveManager {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<Event>,
    sink: EventSink,
}

fn make_sink(inner: &Arc<Mutex<Inner>>) -> EventSink {
    let weak: Weak<Mutex<Inner>> = Arc::downgrade(inner);

    EventSink::new(move |event| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let sink = make_sink(&inner);
        inner
            .lock()
            .expect("Failed to lock receive manager state")
            .handle_event(event, &sink);
    })
}

impl BleReceiveManager {
    pub fn new(adapter: Arc<dyn BleAdapter>, target: Target) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let inner = Arc::new(Mutex::new(Inner {
            target,
            adapter,
            events: events.clone(),
            phase: Phase::Idle,
            scanning: false,
            attempts: 0,
            session: None,
        }));
        let sink = make_sink(&inner);

        BleReceiveManager { inner, events, sink }
    }

    /// Subscribe to the event stream. Only events emitted after this call are
    /// observed; a reader lagging more than the channel capacity loses the
    /// oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Begin the scan-to-relay handshake. Resets the retry budget; a no-op
    /// after [`close_connection`](Self::close_connection).
    pub fn start_receiving(&self) {
        let mut inner = self.lock();

        if inner.phase == Phase::Closed {
            warn!("start_receiving called after close_connection; ignoring");
            return;
        }

        inner.attempts = 0;
        inner.begin_scan(&self.sink);
    }

    /// Resume the existing link without a new scan. No-op without a session.
    pub fn reconnect(&self) {
        let inner = self.lock();

        match &inner.session {
            Some(session) => {
                info!("Reconnecting...");
                if let Err(err) = session.link().connect() {
                    warn!("Reconnect request failed: {}", err);
                }
            },
            None => debug!("Reconnect requested without an active session"),
        }
    }

    /// Request a disconnect; the resulting transition arrives asynchronously
    /// on the event stream.
    pub fn disconnect(&self) {
        let inner = self.lock();

        if let Some(session) = &inner.session {
            if let Err(err) = session.link().disconnect() {
                warn!("Disconnect request failed: {}", err);
            }
        }
    }

    /// Terminal teardown: stops any scan, best-effort disables the
    /// notification subscription and releases the link. No event is emitted
    /// after this returns; late callbacks are dropped.
    pub fn close_connection(&self) {
        let mut inner = self.lock();

        inner.adapter.stop_scan();
        inner.scanning = false;

        if let Some(session) = inner.session.take() {
            session.disable_notifications(&inner.target);
            session.close();
        }

        inner.phase = Phase::Closed;
        info!("Connection closed");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("Failed to lock receive manager state")
    }
}

impl Inner {
    fn emit(&self, event: Event) {
        // send only fails when nobody is subscribed; delivery is best-effort
        let _ = self.events.send(event);
    }

    fn handle_event(&mut self, event: AdapterEvent, sink: &EventSink) {
        if self.phase == Phase::Closed {
            debug!("Dropping adapter event after close: {:?}", event);
            return;
        }

        match event {
            AdapterEvent::ScanResult(advertisement) => self.on_scan_result(advertisement, sink),
            AdapterEvent::ConnectionStateChange { status, state } => {
                self.on_connection_state_change(status, state, sink)
            },
            AdapterEvent::ServicesDiscovered { status, services } => {
                self.on_services_discovered(status, services, sink)
            },
            AdapterEvent::MtuChanged { status, mtu } => self.on_mtu_changed(status, mtu),
            AdapterEvent::CharacteristicChanged { characteristic, value } => {
                self.on_characteristic_changed(characteristic, value)
            },
        }
    }

    fn begin_scan(&mut self, sink: &EventSink) {
        self.emit(Event::Loading(String::from("Scanning...")));
        self.scanning = true;
        self.phase = Phase::Scanning;

        if let Err(err) = self.adapter.start_scan(ScanSettings::low_latency(), sink.clone()) {
            warn!("Failed to start scanning: {}", err);
            self.scanning = false;
            self.connect_attempt_failed(sink);
        }
    }

    fn on_scan_result(&mut self, advertisement: Advertisement, sink: &EventSink) {
        // Platforms may deliver duplicate or late results after stopScan.
        if !self.scanning {
            debug!("Ignoring scan result while not scanning");
            return;
        }

        if !self.target.matches_address(&advertisement.address) {
            return;
        }

        info!(
            "Found {} {:?}; connecting",
            advertisement.address, advertisement.local_name
        );
        self.emit(Event::Loading(String::from("Connecting...")));
        self.scanning = false;
        self.adapter.stop_scan();

        // Only one session may exist at a time.
        if let Some(old) = self.session.take() {
            warn!("A previous session was still open; closing it");
            old.close();
        }

        match self
            .adapter
            .connect(&advertisement.address, Transport::Le, sink.clone())
        {
            Ok(link) => {
                self.session = Some(Session::new(link));
                self.phase = Phase::Connecting;
            },
            Err(err) => {
                warn!("Connect request failed: {}", err);
                self.connect_attempt_failed(sink);
            },
        }
    }

    fn on_connection_state_change(
        &mut self,
        status: GattStatus,
        state: LinkState,
        sink: &EventSink,
    ) {
        if !status.is_success() {
            if self.session.is_none() && self.phase != Phase::Connecting {
                debug!("Ignoring stale connection failure (status {:?})", status);
                return;
            }
            warn!("Connection attempt failed with status {:?}", status);
            self.connect_attempt_failed(sink);
            return;
        }

        match state {
            LinkState::Connected => {
                if self.phase != Phase::Connecting {
                    debug!("Ignoring connected callback in phase {:?}", self.phase);
                    return;
                }
                let Some(session) = &self.session else {
                    return;
                };

                self.emit(Event::Loading(String::from("Discovering services...")));
                if let Err(err) = session.link().discover_services() {
                    warn!("Service discovery request failed: {}", err);
                    self.connect_attempt_failed(sink);
                    return;
                }
                self.phase = Phase::DiscoveringServices;
            },
            LinkState::Disconnected => {
                let Some(session) = self.session.take() else {
                    debug!("Ignoring disconnect without a session");
                    return;
                };
                session.close();
                self.emit(Event::Success(DeviceUpdate::state(ConnectionState::Disconnected)));
                self.phase = Phase::Idle;
                info!("Disconnected");
            },
        }
    }

    fn connect_attempt_failed(&mut self, sink: &EventSink) {
        if let Some(session) = self.session.take() {
            session.close();
        }

        self.attempts += 1;
        let max = self.target.max_connection_attempts;
        self.emit(Event::Loading(format!(
            "Attempting to connect {}/{}",
            self.attempts, max
        )));

        if self.attempts < max {
            // Retry walks the full scan-to-connect path again.
            self.begin_scan(sink);
        } else {
            self.emit(Event::Error(String::from("Could not connect to BLE device")));
            self.scanning = false;
            self.phase = Phase::Failed;
        }
    }

    fn on_services_discovered(
        &mut self,
        status: GattStatus,
        services: Vec<crate::adapter::Service>,
        sink: &EventSink,
    ) {
        if self.phase != Phase::DiscoveringServices {
            debug!("Ignoring services-discovered callback in phase {:?}", self.phase);
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };

        if !status.is_success() {
            warn!("Service discovery reported status {:?}", status);
        }
        session.set_services(services);
        let link = session.link().clone();

        self.emit(Event::Loading(String::from("Adjusting MTU...")));
        if let Err(err) = link.request_mtu(self.target.requested_mtu) {
            warn!("MTU request failed: {}", err);
            self.connect_attempt_failed(sink);
            return;
        }
        self.phase = Phase::NegotiatingMtu;
    }

    fn on_mtu_changed(&mut self, status: GattStatus, mtu: u16) {
        if self.phase != Phase::NegotiatingMtu {
            debug!("Ignoring MTU callback in phase {:?}", self.phase);
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };

        if !status.is_success() {
            warn!("MTU negotiation reported status {:?}", status);
        }
        session.set_mtu(mtu);
        debug!("MTU set to {}", mtu);

        match session.enable_notifications(&self.target) {
            Ok(()) => {
                self.phase = Phase::Relaying;
                info!("Receiving from {}", self.target.device_address);
            },
            Err(BleError::MissingCharacteristic) => {
                self.emit(Event::Error(String::from("Could not find characteristics")));
                self.phase = Phase::Failed;
            },
            Err(err) => {
                error!("Failed to enable notifications: {}", err);
                self.emit(Event::Error(String::from("Could not enable notifications")));
                self.phase = Phase::Failed;
            },
        }
    }

    fn on_characteristic_changed(&mut self, characteristic: Uuid, value: Vec<u8>) {
        if self.phase != Phase::Relaying {
            debug!("Ignoring characteristic change in phase {:?}", self.phase);
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        // Anything other than the subscribed characteristic is dropped.
        if session.subscribed() != Some(&characteristic) {
            debug!("Ignoring change of foreign characteristic {}", characteristic);
            return;
        }

        self.emit(Event::Success(DeviceUpdate::notification(value)));
    }
}
