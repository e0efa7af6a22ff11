mod machine;
mod progress;
mod sequencer;

pub use progress::{BootOrderError, BootProgress};
pub use sequencer::{
    AuxiliaryStorage, BootReport, BootSequencer, FatalBootError, FatalCause, NodeParts,
};

/// Startup stages, strictly forward.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum BootStage {
    Uninitialized,
    StorageReady,
    RadioReady,
    MeshReady,
    TransportReady,
    Running,
}

impl BootStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::StorageReady => "storage-ready",
            Self::RadioReady => "radio-ready",
            Self::MeshReady => "mesh-ready",
            Self::TransportReady => "transport-ready",
            Self::Running => "running",
        }
    }
}

/// Completion of one boot step, fed to [`BootProgress`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BootEvent {
    StorageMounted,
    RadioReady,
    MeshStarted,
    TransportAttached,
    PeripheralsStarted,
}
