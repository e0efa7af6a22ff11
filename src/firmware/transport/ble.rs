use heapless::String;

use super::{
    super::{
        capability::{BlePeripheral, Board, MonotonicClock},
        types::{NodePrefs, TransportKind},
    },
    CompanionLink, LinkReport, LinkSession,
};

pub const BLE_DEVICE_NAME_MAX: usize = 48;

/// Advertised name: configured prefix followed by the node name, cut at
/// [`BLE_DEVICE_NAME_MAX`] bytes on a character boundary.
pub fn device_name(prefix: &str, prefs: &NodePrefs) -> String<BLE_DEVICE_NAME_MAX> {
    let mut name = String::new();
    for ch in prefix.chars().chain(prefs.node_name.chars()) {
        if name.push(ch).is_err() {
            break;
        }
    }
    name
}

pub struct BleLink<'a, P> {
    peripheral: P,
    name_prefix: &'a str,
}

impl<'a, P: BlePeripheral> BleLink<'a, P> {
    pub fn new(peripheral: P, name_prefix: &'a str) -> Self {
        Self {
            peripheral,
            name_prefix,
        }
    }

    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }
}

impl<P: BlePeripheral> CompanionLink for BleLink<'_, P> {
    const KIND: TransportKind = TransportKind::Ble;

    async fn bring_up<B, K>(&mut self, session: LinkSession<'_, B, K>) -> LinkReport
    where
        B: Board,
        K: MonotonicClock,
    {
        let name = device_name(self.name_prefix, session.prefs);
        self.peripheral.begin(&name, session.ble_pin);
        log::info!("link: BLE companion advertising as '{}'", name);
        LinkReport::local(Self::KIND)
    }
}
