//! Narrow interfaces of the collaborators the boot sequence wires together.
//!
//! Every slot is filled by exactly one concrete type per image, chosen in the
//! composition root through [`CapabilityBinding`]. Nothing here dispatches at
//! runtime between variants of the same slot.

use core::fmt::Debug;

use rand::rngs::SmallRng;

use super::{
    storage::MountStatus,
    transport::{CompanionLink, SerialPins},
    types::{
        BuildProfile, DisplayPresence, JoinedNetwork, LinkStatus, NetworkCandidate, NodePrefs,
    },
};

/// Low-level board facilities: clocks, console, power rails.
pub trait Board {
    type Error: Debug;

    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Keeps the board out of light sleep while a network link is active.
    fn set_inhibit_sleep(&mut self, inhibit: bool);
}

pub trait StorageBackend {
    type Error: Debug;

    /// Brings up the primary region. Failure is fatal for boot.
    fn mount_primary(&mut self) -> Result<MountStatus, Self::Error>;

    /// Brings up the auxiliary region, `None` when the backend has none.
    fn mount_auxiliary(&mut self) -> Option<Result<MountStatus, Self::Error>> {
        None
    }
}

pub trait RadioDriver {
    type Error: Debug;

    fn init(&mut self) -> Result<(), Self::Error>;

    /// Entropy sampled from the radio front end. Only valid after `init`.
    fn rng_seed(&mut self) -> u32;
}

pub trait DataStore {
    fn begin(&mut self);
}

pub trait MeshEngine {
    type Radio: RadioDriver;
    type Store: DataStore;
    type Transport;

    /// Takes ownership of the initialized radio and started store.
    fn begin(&mut self, radio: Self::Radio, store: Self::Store, rng: SmallRng, has_display: bool);

    /// Attaches the started companion transport.
    fn start_interface(&mut self, transport: Self::Transport);

    fn poll(&mut self);

    fn node_prefs(&self) -> &NodePrefs;

    fn ble_pin(&self) -> u32;
}

pub trait SensorHub {
    fn begin(&mut self) -> bool;

    fn poll(&mut self);
}

/// Board without environment sensors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSensors;

impl SensorHub for NoSensors {
    fn begin(&mut self) -> bool {
        true
    }

    fn poll(&mut self) {}
}

pub trait DisplaySlot {
    const PRESENCE: DisplayPresence;

    /// Powers the panel and shows the loading splash. Returns whether a
    /// display is usable.
    fn begin(&mut self) -> bool;

    fn start_ui(&mut self, prefs: &NodePrefs);

    fn poll(&mut self);
}

/// Display slot of a headless image.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDisplay;

impl DisplaySlot for NoDisplay {
    const PRESENCE: DisplayPresence = DisplayPresence::Absent;

    fn begin(&mut self) -> bool {
        false
    }

    fn start_ui(&mut self, _prefs: &NodePrefs) {}

    fn poll(&mut self) {}
}

pub trait RtcClock {
    fn tick(&mut self);

    fn current_time(&self) -> u32;
}

pub trait MonotonicClock {
    fn now_ms(&self) -> u64;

    async fn delay_ms(&mut self, millis: u32);
}

/// Station side of the network stack used by the join loop.
pub trait NetworkStack {
    type Error: Debug;

    /// Station mode with radio power saving disabled.
    fn prepare_station(&mut self) -> Result<(), Self::Error>;

    fn register(&mut self, candidate: &NetworkCandidate<'_>) -> Result<(), Self::Error>;

    /// Drives the stack one step and reports the station status. Must return
    /// promptly; the join loop owns the waiting.
    async fn poll_status(&mut self) -> LinkStatus;

    fn joined(&self) -> Option<JoinedNetwork>;
}

pub trait SerialPort {
    fn begin(&mut self, baud: u32, pins: Option<SerialPins>);
}

pub trait BlePeripheral {
    fn begin(&mut self, device_name: &str, pin: u32);
}

pub trait TcpServer {
    fn begin(&mut self, port: u16);
}

/// Build-time choice of one implementation per capability slot.
pub trait CapabilityBinding {
    type Board: Board;
    type Storage: StorageBackend;
    type Radio: RadioDriver;
    type Store: DataStore;
    type Link: CompanionLink;
    type Mesh: MeshEngine<Radio = Self::Radio, Store = Self::Store, Transport = Self::Link>;
    type Sensors: SensorHub;
    type Display: DisplaySlot;
    type Rtc: RtcClock;
    type Clock: MonotonicClock;
}

/// Whether a binding fills the display and transport slots the way `profile`
/// says this image was built.
pub const fn binding_matches_profile<C: CapabilityBinding>(profile: BuildProfile) -> bool {
    <C::Display as DisplaySlot>::PRESENCE.is_present() == profile.display.is_present()
        && <C::Link as CompanionLink>::KIND as u8 == profile.transport as u8
}
