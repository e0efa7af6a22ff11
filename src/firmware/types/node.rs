use heapless::String;

pub const NODE_NAME_MAX: usize = 32;

/// Node preferences as exposed by the mesh engine. Boot reads the node name
/// for the BLE device name; the UI gets a read-only reference.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NodePrefs {
    pub node_name: String<NODE_NAME_MAX>,
    pub radio_freq_khz: u32,
    pub radio_bandwidth_hz: u32,
    pub radio_spreading_factor: u8,
    pub tx_power_dbm: i8,
}

impl NodePrefs {
    pub fn with_name(name: &str) -> Self {
        let mut prefs = Self::default();
        for ch in name.chars() {
            if prefs.node_name.push(ch).is_err() {
                break;
            }
        }
        prefs
    }
}
