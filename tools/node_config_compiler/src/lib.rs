use std::{env, fmt, fs, path::Path};

use serde::Deserialize;

pub const NETWORKS_MAX: usize = 3;
pub const SSID_MAX: usize = 32;
pub const PASSWORD_MAX: usize = 64;
pub const BLE_NAME_PREFIX_MAX: usize = 16;
pub const REGION_ALIGN: u32 = 4096;
pub const DEFAULT_TCP_PORT: u16 = 5000;
pub const DEFAULT_JOIN_DEADLINE_MS: u32 = 20_000;
pub const DEFAULT_JOIN_POLL_INTERVAL_MS: u32 = 250;
pub const DEFAULT_BAUD: u32 = 115_200;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
    Variant(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Variant(msg) => write!(f, "variant selection error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeConfigFile {
    #[serde(default)]
    pub console: ConsoleSection,
    pub storage: StorageSection,
    #[serde(default)]
    pub transport: TransportSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    #[serde(default = "default_baud")]
    pub baud: u32,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    pub primary: RegionSection,
    pub auxiliary: Option<RegionSection>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegionSection {
    pub offset: u32,
    pub size: u32,
}

impl RegionSection {
    fn end(self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    fn overlaps(self, other: RegionSection) -> bool {
        u64::from(self.offset) < other.end() && u64::from(other.offset) < self.end()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    pub serial: Option<SerialSection>,
    pub ble: Option<BleSection>,
    pub wifi: Option<WifiSection>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SerialSection {
    #[serde(default = "default_baud")]
    pub baud: u32,
    pub rx_pin: Option<u8>,
    pub tx_pin: Option<u8>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BleSection {
    pub name_prefix: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WifiSection {
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    #[serde(default = "default_join_deadline_ms")]
    pub deadline_ms: u32,
    #[serde(default = "default_join_poll_interval_ms")]
    pub poll_interval_ms: u32,
    pub networks: Vec<NetworkSection>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    pub ssid: String,
    pub password: Option<String>,
}

fn default_baud() -> u32 {
    DEFAULT_BAUD
}

fn default_tcp_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_join_deadline_ms() -> u32 {
    DEFAULT_JOIN_DEADLINE_MS
}

fn default_join_poll_interval_ms() -> u32 {
    DEFAULT_JOIN_POLL_INTERVAL_MS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageVariant {
    Flash,
    FlashExtra,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportVariant {
    Serial,
    Ble,
    Wifi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantSelection {
    pub storage: StorageVariant,
    pub transport: TransportVariant,
    pub display: bool,
}

const STORAGE_FEATURES: [(&str, StorageVariant); 2] = [
    ("storage-flash", StorageVariant::Flash),
    ("storage-flash-extra", StorageVariant::FlashExtra),
];

const TRANSPORT_FEATURES: [(&str, TransportVariant); 3] = [
    ("transport-serial", TransportVariant::Serial),
    ("transport-ble", TransportVariant::Ble),
    ("transport-wifi", TransportVariant::Wifi),
];

impl VariantSelection {
    /// Resolves one variant per slot from a feature predicate; zero or
    /// several enabled features for a slot is an error.
    pub fn from_features<F>(enabled: F) -> Result<Self, ConfigCompilerError>
    where
        F: Fn(&str) -> bool,
    {
        let storage = pick_one("storage", &STORAGE_FEATURES, &enabled)?;
        let transport = pick_one("transport", &TRANSPORT_FEATURES, &enabled)?;
        Ok(Self {
            storage,
            transport,
            display: enabled("display"),
        })
    }

    /// Reads `CARGO_FEATURE_*` variables; only meaningful inside a build script.
    pub fn from_cargo_env() -> Result<Self, ConfigCompilerError> {
        Self::from_features(|feature| env::var_os(cargo_feature_var(feature)).is_some())
    }
}

fn cargo_feature_var(feature: &str) -> String {
    let mut name = String::from("CARGO_FEATURE_");
    for ch in feature.chars() {
        if ch == '-' {
            name.push('_');
        } else {
            name.push(ch.to_ascii_uppercase());
        }
    }
    name
}

fn pick_one<T: Copy, F>(
    slot: &str,
    candidates: &[(&str, T)],
    enabled: &F,
) -> Result<T, ConfigCompilerError>
where
    F: Fn(&str) -> bool,
{
    let selected: Vec<(&str, T)> = candidates
        .iter()
        .copied()
        .filter(|(feature, _)| enabled(feature))
        .collect();
    match selected.as_slice() {
        [(_, variant)] => Ok(*variant),
        [] => Err(ConfigCompilerError::Variant(format!(
            "no {slot} variant enabled; enable exactly one of {}",
            feature_list(candidates)
        ))),
        many => Err(ConfigCompilerError::Variant(format!(
            "{slot} variants are mutually exclusive, got {}",
            many.iter()
                .map(|(feature, _)| *feature)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn feature_list<T>(candidates: &[(&str, T)]) -> String {
    candidates
        .iter()
        .map(|(feature, _)| *feature)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_node_file(path: &Path) -> Result<NodeConfigFile, ConfigCompilerError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_node_str(&text)
}

pub fn parse_node_str(text: &str) -> Result<NodeConfigFile, ConfigCompilerError> {
    toml::from_str(text).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(
    config: &NodeConfigFile,
    selection: &VariantSelection,
) -> Result<(), ConfigCompilerError> {
    if config.console.baud == 0 {
        return invalid("console.baud must be > 0");
    }

    validate_region("storage.primary", config.storage.primary)?;
    if let Some(auxiliary) = config.storage.auxiliary {
        validate_region("storage.auxiliary", auxiliary)?;
        if auxiliary.overlaps(config.storage.primary) {
            return invalid("storage.auxiliary must not overlap storage.primary");
        }
    }
    if selection.storage == StorageVariant::FlashExtra && config.storage.auxiliary.is_none() {
        return invalid("storage-flash-extra requires a [storage.auxiliary] section");
    }

    if let Some(serial) = &config.transport.serial {
        validate_serial(serial)?;
    }
    if let Some(ble) = &config.transport.ble {
        validate_ble(ble)?;
    }
    if let Some(wifi) = &config.transport.wifi {
        validate_wifi(wifi)?;
    }

    match selection.transport {
        TransportVariant::Serial if config.transport.serial.is_none() => {
            invalid("transport-serial requires a [transport.serial] section")
        }
        TransportVariant::Ble if config.transport.ble.is_none() => {
            invalid("transport-ble requires a [transport.ble] section")
        }
        TransportVariant::Wifi if config.transport.wifi.is_none() => {
            invalid("transport-wifi requires a [transport.wifi] section")
        }
        _ => Ok(()),
    }
}

fn invalid<T>(msg: &str) -> Result<T, ConfigCompilerError> {
    Err(ConfigCompilerError::Validation(msg.to_string()))
}

fn validate_region(name: &str, region: RegionSection) -> Result<(), ConfigCompilerError> {
    if region.size == 0 {
        return Err(ConfigCompilerError::Validation(format!(
            "{name}.size must be > 0"
        )));
    }
    if region.offset % REGION_ALIGN != 0 || region.size % REGION_ALIGN != 0 {
        return Err(ConfigCompilerError::Validation(format!(
            "{name}.offset and {name}.size must be multiples of {REGION_ALIGN}"
        )));
    }
    if region.end() > u64::from(u32::MAX) {
        return Err(ConfigCompilerError::Validation(format!(
            "{name} must end within the 32-bit flash address space"
        )));
    }
    Ok(())
}

fn validate_serial(serial: &SerialSection) -> Result<(), ConfigCompilerError> {
    if serial.baud == 0 {
        return invalid("transport.serial.baud must be > 0");
    }
    match (serial.rx_pin, serial.tx_pin) {
        (Some(rx), Some(tx)) if rx == tx => {
            invalid("transport.serial.rx_pin and tx_pin must differ")
        }
        (Some(_), Some(_)) | (None, None) => Ok(()),
        _ => invalid("transport.serial.rx_pin and tx_pin must be set together"),
    }
}

fn validate_ble(ble: &BleSection) -> Result<(), ConfigCompilerError> {
    if ble.name_prefix.len() > BLE_NAME_PREFIX_MAX {
        return Err(ConfigCompilerError::Validation(format!(
            "transport.ble.name_prefix must be at most {BLE_NAME_PREFIX_MAX} bytes"
        )));
    }
    Ok(())
}

fn validate_wifi(wifi: &WifiSection) -> Result<(), ConfigCompilerError> {
    if wifi.tcp_port == 0 {
        return invalid("transport.wifi.tcp_port must be > 0");
    }
    if wifi.poll_interval_ms == 0 {
        return invalid("transport.wifi.poll_interval_ms must be > 0");
    }
    if wifi.poll_interval_ms > wifi.deadline_ms {
        return invalid("transport.wifi.poll_interval_ms must be <= transport.wifi.deadline_ms");
    }
    if wifi.networks.is_empty() {
        return invalid("transport.wifi.networks must list at least one network");
    }
    if wifi.networks.len() > NETWORKS_MAX {
        return Err(ConfigCompilerError::Validation(format!(
            "transport.wifi.networks supports at most {NETWORKS_MAX} entries"
        )));
    }

    for (idx, network) in wifi.networks.iter().enumerate() {
        if network.ssid.is_empty() || network.ssid.len() > SSID_MAX {
            return Err(ConfigCompilerError::Validation(format!(
                "transport.wifi.networks[{idx}].ssid must be 1..={SSID_MAX} bytes"
            )));
        }
        match &network.password {
            Some(password) if password.len() > PASSWORD_MAX => {
                return Err(ConfigCompilerError::Validation(format!(
                    "transport.wifi.networks[{idx}].password must be at most {PASSWORD_MAX} bytes"
                )));
            }
            None if idx > 0 => {
                return Err(ConfigCompilerError::Validation(format!(
                    "transport.wifi.networks[{idx}].password is required for secondary networks"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn render_generated_config(config: &NodeConfigFile, selection: &VariantSelection) -> String {
    let mut out = String::new();
    out.push_str("// @generated by node_config_compiler from the node configuration file.\n");
    out.push_str("// Do not edit by hand.\n\n");

    let storage = match selection.storage {
        StorageVariant::Flash => "StorageKind::Flash",
        StorageVariant::FlashExtra => "StorageKind::FlashWithExtra",
    };
    let transport = match selection.transport {
        TransportVariant::Serial => "TransportKind::Serial",
        TransportVariant::Ble => "TransportKind::Ble",
        TransportVariant::Wifi => "TransportKind::Wifi",
    };
    let display = if selection.display {
        "DisplayPresence::Present"
    } else {
        "DisplayPresence::Absent"
    };

    out.push_str("pub const BUILD_PROFILE: BuildProfile = BuildProfile {\n");
    out.push_str(&format!("    storage: {storage},\n"));
    out.push_str(&format!("    transport: {transport},\n"));
    out.push_str(&format!("    display: {display},\n"));
    out.push_str("};\n\n");

    out.push_str(&format!(
        "pub const CONSOLE_BAUD: u32 = {};\n\n",
        config.console.baud
    ));

    out.push_str(&render_region("PRIMARY_REGION", config.storage.primary));
    if selection.storage == StorageVariant::FlashExtra {
        if let Some(auxiliary) = config.storage.auxiliary {
            out.push_str(&render_region("AUXILIARY_REGION", auxiliary));
        }
    }

    match selection.transport {
        TransportVariant::Serial => {
            if let Some(serial) = &config.transport.serial {
                out.push_str(&render_serial(serial));
            }
        }
        TransportVariant::Ble => {
            if let Some(ble) = &config.transport.ble {
                out.push_str(&format!(
                    "\npub const BLE_NAME_PREFIX: &str = {:?};\n",
                    ble.name_prefix
                ));
            }
        }
        TransportVariant::Wifi => {
            if let Some(wifi) = &config.transport.wifi {
                out.push_str(&render_wifi(wifi));
            }
        }
    }

    out
}

fn render_region(name: &str, region: RegionSection) -> String {
    format!(
        "pub const {name}: RegionLayout = RegionLayout {{\n    offset: 0x{:X},\n    size: 0x{:X},\n}};\n",
        region.offset, region.size
    )
}

fn render_serial(serial: &SerialSection) -> String {
    let pins = match (serial.rx_pin, serial.tx_pin) {
        (Some(rx), Some(tx)) => format!("Some(SerialPins {{ rx: {rx}, tx: {tx} }})"),
        _ => "None".to_string(),
    };
    format!(
        "\npub const SERIAL_LINK: SerialLinkConfig = SerialLinkConfig {{\n    baud: {},\n    pins: {pins},\n}};\n",
        serial.baud
    )
}

fn render_wifi(wifi: &WifiSection) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\npub const WIFI_TCP_PORT: u16 = {};\n",
        wifi.tcp_port
    ));
    out.push_str(&format!(
        "\npub const WIFI_JOIN_POLICY: JoinPolicy = JoinPolicy {{\n    deadline_ms: {},\n    poll_interval_ms: {},\n}};\n",
        wifi.deadline_ms, wifi.poll_interval_ms
    ));
    out.push_str(&format!(
        "\npub const WIFI_CANDIDATES: [NetworkCandidate<'static>; {}] = [\n",
        wifi.networks.len()
    ));
    for (idx, network) in wifi.networks.iter().enumerate() {
        let password = network.password.as_deref().unwrap_or("");
        out.push_str(&format!(
            "    NetworkCandidate {{\n        priority: {idx},\n        ssid: {:?},\n        password: {:?},\n    }},\n",
            network.ssid, password
        ));
    }
    out.push_str("];\n");
    out
}

pub fn generate_from_path(
    path: &Path,
    selection: &VariantSelection,
) -> Result<String, ConfigCompilerError> {
    let config = parse_node_file(path)?;
    validate_config(&config, selection)?;
    Ok(render_generated_config(&config, selection))
}
