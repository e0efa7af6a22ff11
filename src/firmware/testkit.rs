//! Host fakes for every capability slot. Side effects land in one shared
//! event log so tests can assert ordering across collaborators.

use core::{cell::Cell, net::Ipv4Addr};
use std::{cell::RefCell, rc::Rc, string::String, vec::Vec};

use embedded_storage::{ReadStorage, Storage};
use rand::rngs::SmallRng;

use super::{
    capability::{
        BlePeripheral, Board, DataStore, DisplaySlot, MeshEngine, MonotonicClock, NetworkStack,
        RadioDriver, RtcClock, SensorHub, SerialPort, StorageBackend, TcpServer,
    },
    storage::MountStatus,
    transport::SerialPins,
    types::{DisplayPresence, JoinedNetwork, LinkStatus, NetworkCandidate, NodePrefs},
};

pub(crate) type EventLog = Rc<RefCell<Vec<&'static str>>>;

pub(crate) fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Monotonic clock whose time only moves on `delay_ms` or `advance`.
#[derive(Clone, Default)]
pub(crate) struct FakeClock {
    now: Rc<Cell<u64>>,
}

impl FakeClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl MonotonicClock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    async fn delay_ms(&mut self, millis: u32) {
        self.advance(u64::from(millis));
    }
}

pub(crate) struct FakeBoard {
    log: EventLog,
    fail: bool,
    inhibit_sleep: bool,
}

impl FakeBoard {
    pub(crate) fn new(log: EventLog) -> Self {
        Self {
            log,
            fail: false,
            inhibit_sleep: false,
        }
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn sleep_inhibited(&self) -> bool {
        self.inhibit_sleep
    }
}

impl Board for FakeBoard {
    type Error = &'static str;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push("board.begin");
        if self.fail {
            return Err("board failed");
        }
        Ok(())
    }

    fn set_inhibit_sleep(&mut self, inhibit: bool) {
        self.log.borrow_mut().push("board.inhibit_sleep");
        self.inhibit_sleep = inhibit;
    }
}

pub(crate) struct FakeStorage {
    log: EventLog,
    primary: Result<MountStatus, &'static str>,
    auxiliary: Option<Result<MountStatus, &'static str>>,
}

impl FakeStorage {
    pub(crate) fn new(log: EventLog) -> Self {
        Self {
            log,
            primary: Ok(MountStatus::Mounted),
            auxiliary: None,
        }
    }

    pub(crate) fn failing_primary(mut self) -> Self {
        self.primary = Err("primary mount failed");
        self
    }

    pub(crate) fn with_auxiliary(mut self, auxiliary: Result<MountStatus, &'static str>) -> Self {
        self.auxiliary = Some(auxiliary);
        self
    }
}

impl StorageBackend for FakeStorage {
    type Error = &'static str;

    fn mount_primary(&mut self) -> Result<MountStatus, Self::Error> {
        self.log.borrow_mut().push("storage.primary");
        self.primary
    }

    fn mount_auxiliary(&mut self) -> Option<Result<MountStatus, Self::Error>> {
        let auxiliary = self.auxiliary?;
        self.log.borrow_mut().push("storage.auxiliary");
        Some(auxiliary)
    }
}

pub(crate) struct FakeRadio {
    log: EventLog,
    fail: bool,
}

impl FakeRadio {
    pub(crate) const SEED: u32 = 0x00C0_FFEE;

    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, fail: false }
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl RadioDriver for FakeRadio {
    type Error = &'static str;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push("radio.init");
        if self.fail {
            return Err("radio not responding");
        }
        Ok(())
    }

    fn rng_seed(&mut self) -> u32 {
        self.log.borrow_mut().push("radio.seed");
        Self::SEED
    }
}

pub(crate) struct FakeStore {
    log: EventLog,
}

impl FakeStore {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl DataStore for FakeStore {
    fn begin(&mut self) {
        self.log.borrow_mut().push("store.begin");
    }
}

pub(crate) struct FakeMesh<T> {
    log: EventLog,
    prefs: NodePrefs,
    pin: u32,
    pub(crate) has_display: Option<bool>,
    pub(crate) transport: Option<T>,
    pub(crate) polls: u32,
}

impl<T> FakeMesh<T> {
    pub(crate) fn new(log: EventLog, prefs: NodePrefs, pin: u32) -> Self {
        Self {
            log,
            prefs,
            pin,
            has_display: None,
            transport: None,
            polls: 0,
        }
    }
}

impl<T> MeshEngine for FakeMesh<T> {
    type Radio = FakeRadio;
    type Store = FakeStore;
    type Transport = T;

    fn begin(&mut self, _radio: FakeRadio, _store: FakeStore, _rng: SmallRng, has_display: bool) {
        self.log.borrow_mut().push("mesh.begin");
        self.has_display = Some(has_display);
    }

    fn start_interface(&mut self, transport: T) {
        self.log.borrow_mut().push("mesh.attach");
        self.transport = Some(transport);
    }

    fn poll(&mut self) {
        self.log.borrow_mut().push("mesh.poll");
        self.polls += 1;
    }

    fn node_prefs(&self) -> &NodePrefs {
        &self.prefs
    }

    fn ble_pin(&self) -> u32 {
        self.pin
    }
}

pub(crate) struct FakeSensors {
    log: EventLog,
    ready: bool,
}

impl FakeSensors {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, ready: true }
    }

    pub(crate) fn unavailable(mut self) -> Self {
        self.ready = false;
        self
    }
}

impl SensorHub for FakeSensors {
    fn begin(&mut self) -> bool {
        self.log.borrow_mut().push("sensors.begin");
        self.ready
    }

    fn poll(&mut self) {
        self.log.borrow_mut().push("sensors.poll");
    }
}

pub(crate) struct FakeDisplay {
    log: EventLog,
    usable: bool,
    pub(crate) ui_name: Option<String>,
}

impl FakeDisplay {
    pub(crate) fn new(log: EventLog) -> Self {
        Self {
            log,
            usable: true,
            ui_name: None,
        }
    }

    pub(crate) fn unusable(mut self) -> Self {
        self.usable = false;
        self
    }
}

impl DisplaySlot for FakeDisplay {
    const PRESENCE: DisplayPresence = DisplayPresence::Present;

    fn begin(&mut self) -> bool {
        self.log.borrow_mut().push("display.begin");
        self.usable
    }

    fn start_ui(&mut self, prefs: &NodePrefs) {
        self.log.borrow_mut().push("display.ui");
        self.ui_name = Some(prefs.node_name.as_str().into());
    }

    fn poll(&mut self) {
        self.log.borrow_mut().push("display.poll");
    }
}

pub(crate) struct FakeRtc {
    log: EventLog,
    seconds: u32,
}

impl FakeRtc {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, seconds: 0 }
    }
}

impl RtcClock for FakeRtc {
    fn tick(&mut self) {
        self.log.borrow_mut().push("rtc.tick");
        self.seconds += 1;
    }

    fn current_time(&self) -> u32 {
        self.seconds
    }
}

/// Station that associates once the clock reaches `connect_at` and gets an
/// address at `address_at` (same instant unless set).
pub(crate) struct FakeNetworkStack {
    log: EventLog,
    clock: FakeClock,
    connect_at: Option<u64>,
    address_at: Option<u64>,
    joining: Option<&'static str>,
    reject_register: Option<usize>,
    poll_cost_ms: u64,
    register_calls: usize,
    registered: Vec<String>,
    polls: u32,
}

impl FakeNetworkStack {
    pub(crate) const ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 20);

    pub(crate) fn new(log: EventLog, clock: FakeClock) -> Self {
        Self {
            log,
            clock,
            connect_at: None,
            address_at: None,
            joining: None,
            reject_register: None,
            poll_cost_ms: 0,
            register_calls: 0,
            registered: Vec::new(),
            polls: 0,
        }
    }

    pub(crate) fn connect_at(mut self, millis: u64) -> Self {
        self.connect_at = Some(millis);
        self
    }

    pub(crate) fn address_at(mut self, millis: u64) -> Self {
        self.address_at = Some(millis);
        self
    }

    pub(crate) fn joining(mut self, ssid: &'static str) -> Self {
        self.joining = Some(ssid);
        self
    }

    pub(crate) fn reject_register(mut self, call: usize) -> Self {
        self.reject_register = Some(call);
        self
    }

    /// Time each poll spends inside the stack.
    pub(crate) fn poll_cost(mut self, millis: u64) -> Self {
        self.poll_cost_ms = millis;
        self
    }

    pub(crate) fn polls(&self) -> u32 {
        self.polls
    }

    pub(crate) fn registered(&self) -> Vec<String> {
        self.registered.clone()
    }

    fn associated(&self) -> bool {
        self.connect_at
            .is_some_and(|at| self.clock.now_ms() >= at)
    }
}

impl NetworkStack for FakeNetworkStack {
    type Error = &'static str;

    fn prepare_station(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push("net.prepare");
        Ok(())
    }

    fn register(&mut self, candidate: &NetworkCandidate<'_>) -> Result<(), Self::Error> {
        self.log.borrow_mut().push("net.register");
        let call = self.register_calls;
        self.register_calls += 1;
        if self.reject_register == Some(call) {
            return Err("register rejected");
        }
        self.registered.push(candidate.ssid.into());
        Ok(())
    }

    async fn poll_status(&mut self) -> LinkStatus {
        self.log.borrow_mut().push("net.poll");
        self.polls += 1;
        self.clock.advance(self.poll_cost_ms);
        if self.associated() {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    fn joined(&self) -> Option<JoinedNetwork> {
        if !self.associated() {
            return None;
        }
        if let Some(at) = self.address_at {
            if self.clock.now_ms() < at {
                return None;
            }
        }
        let ssid = match self.joining {
            Some(ssid) => ssid,
            None => self.registered.first()?.as_str(),
        };
        let mut name = heapless::String::new();
        name.push_str(ssid).ok()?;
        Some(JoinedNetwork {
            ssid: name,
            address: Self::ADDRESS,
            rssi_dbm: Some(-61),
        })
    }
}

pub(crate) struct FakeSerialPort {
    log: EventLog,
    pub(crate) began: Option<(u32, Option<SerialPins>)>,
}

impl FakeSerialPort {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, began: None }
    }
}

impl SerialPort for FakeSerialPort {
    fn begin(&mut self, baud: u32, pins: Option<SerialPins>) {
        self.log.borrow_mut().push("serial.begin");
        self.began = Some((baud, pins));
    }
}

pub(crate) struct FakeBle {
    log: EventLog,
    pub(crate) began: Option<(String, u32)>,
}

impl FakeBle {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, began: None }
    }
}

impl BlePeripheral for FakeBle {
    fn begin(&mut self, device_name: &str, pin: u32) {
        self.log.borrow_mut().push("ble.begin");
        self.began = Some((device_name.into(), pin));
    }
}

pub(crate) struct FakeTcp {
    log: EventLog,
    pub(crate) port: Option<u16>,
}

impl FakeTcp {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log, port: None }
    }
}

impl TcpServer for FakeTcp {
    fn begin(&mut self, port: u16) {
        self.log.borrow_mut().push("tcp.begin");
        self.port = Some(port);
    }
}

/// NOR-flash stand-in: erased bytes read as `0xFF`.
pub(crate) struct MemFlash {
    bytes: Vec<u8>,
    reads: usize,
    writes: usize,
    fail_reads: bool,
    drop_writes: bool,
}

impl MemFlash {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0xFF; capacity],
            reads: 0,
            writes: 0,
            fail_reads: false,
            drop_writes: false,
        }
    }

    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn dropping_writes(mut self) -> Self {
        self.drop_writes = true;
        self
    }

    pub(crate) fn poke(&mut self, offset: u32, byte: u8) {
        self.bytes[offset as usize] = byte;
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes
    }

    fn span(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, &'static str> {
        let start = offset as usize;
        let end = start + len;
        if end > self.bytes.len() {
            return Err("out of range");
        }
        Ok(start..end)
    }
}

impl ReadStorage for MemFlash {
    type Error = &'static str;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.reads += 1;
        if self.fail_reads {
            return Err("read failed");
        }
        let span = self.span(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[span]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for MemFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.writes += 1;
        let span = self.span(offset, bytes.len())?;
        if !self.drop_writes {
            self.bytes[span].copy_from_slice(bytes);
        }
        Ok(())
    }
}
