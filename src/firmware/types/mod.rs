mod network;
mod node;
mod profile;

pub use network::{
    JoinAttemptResult, JoinOutcome, JoinPolicy, JoinedNetwork, LinkStatus, NetworkCandidate,
    JOIN_DEADLINE_DEFAULT_MS, JOIN_POLL_INTERVAL_DEFAULT_MS, NETWORK_CANDIDATES_MAX,
    NETWORK_PASSWORD_MAX, NETWORK_SSID_MAX, TCP_PORT_DEFAULT,
};
pub use node::{NodePrefs, NODE_NAME_MAX};
pub use profile::{BuildProfile, DisplayPresence, StorageKind, TransportKind};
