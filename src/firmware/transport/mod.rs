//! Companion transports. Exactly one is compiled into an image; host tests
//! build all of them.

#[cfg(any(feature = "transport-ble", test))]
mod ble;
#[cfg(any(feature = "transport-serial", test))]
mod serial;
#[cfg(any(feature = "transport-wifi", test))]
mod wifi;

#[cfg(any(feature = "transport-ble", test))]
pub use ble::{device_name, BleLink, BLE_DEVICE_NAME_MAX};
#[cfg(any(feature = "transport-serial", test))]
pub use serial::SerialLink;
#[cfg(any(feature = "transport-wifi", test))]
pub use wifi::WifiLink;

use super::{
    capability::{Board, MonotonicClock},
    types::{JoinAttemptResult, NodePrefs, TransportKind},
};

/// UART RX/TX remap. Both pins or neither.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SerialPins {
    pub rx: u8,
    pub tx: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SerialLinkConfig {
    pub baud: u32,
    pub pins: Option<SerialPins>,
}

/// What the boot sequencer lends a transport while it starts.
pub struct LinkSession<'a, B, K> {
    pub board: &'a mut B,
    pub clock: &'a mut K,
    pub prefs: &'a NodePrefs,
    pub ble_pin: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LinkReport {
    pub kind: TransportKind,
    /// Present only on network transports.
    pub join: Option<JoinAttemptResult>,
}

impl LinkReport {
    pub const fn local(kind: TransportKind) -> Self {
        Self { kind, join: None }
    }

    pub fn is_joined(&self) -> bool {
        self.join
            .as_ref()
            .is_some_and(|result| result.is_joined())
    }
}

/// Transport the host application talks to. `bring_up` never fails: a link
/// that could not fully start still comes up degraded and reports why.
pub trait CompanionLink {
    const KIND: TransportKind;

    async fn bring_up<B, K>(&mut self, session: LinkSession<'_, B, K>) -> LinkReport
    where
        B: Board,
        K: MonotonicClock;
}
