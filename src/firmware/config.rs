//! Build-time node configuration rendered from `config/node.toml` by
//! `build.rs`. Only the selected variants' constants exist.

#[allow(unused_imports)]
use super::{
    storage::RegionLayout,
    transport::{SerialLinkConfig, SerialPins},
    types::{
        BuildProfile, DisplayPresence, JoinPolicy, NetworkCandidate, StorageKind, TransportKind,
    },
};

include!(concat!(env!("OUT_DIR"), "/node_config.rs"));

/// Level the target console logger is installed with.
pub const CONSOLE_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
