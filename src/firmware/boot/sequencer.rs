use core::fmt;

use rand::{rngs::SmallRng, SeedableRng};

use super::{
    super::{
        capability::{
            Board, CapabilityBinding, DataStore, DisplaySlot, MeshEngine, RadioDriver, SensorHub,
            StorageBackend,
        },
        runtime::RunningNode,
        storage::MountStatus,
        transport::{CompanionLink, LinkReport, LinkSession},
    },
    BootEvent, BootProgress, BootStage,
};

/// Every collaborator of one image, built once by the composition root.
pub struct NodeParts<C: CapabilityBinding> {
    pub board: C::Board,
    pub storage: C::Storage,
    pub radio: C::Radio,
    pub store: C::Store,
    pub mesh: C::Mesh,
    pub link: C::Link,
    pub sensors: C::Sensors,
    pub display: C::Display,
    pub rtc: C::Rtc,
    pub clock: C::Clock,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FatalCause {
    BoardBringUp,
    PrimaryStorage,
    RadioInit,
}

impl FatalCause {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BoardBringUp => "board bring-up failed",
            Self::PrimaryStorage => "primary storage mount failed",
            Self::RadioInit => "radio init failed",
        }
    }
}

/// Unrecoverable boot failure. `stage` is the last stage that completed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FatalBootError {
    pub stage: BootStage,
    pub cause: FatalCause,
}

impl fmt::Display for FatalBootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.cause.label(), self.stage.label())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuxiliaryStorage {
    NotBound,
    Mounted(MountStatus),
    Failed,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BootReport {
    pub has_display: bool,
    pub primary: MountStatus,
    pub auxiliary: AuxiliaryStorage,
    pub sensors_ready: bool,
    pub link: LinkReport,
}

pub struct BootSequencer<C: CapabilityBinding> {
    parts: NodeParts<C>,
    progress: BootProgress,
}

impl<C: CapabilityBinding> BootSequencer<C> {
    pub fn new(parts: NodeParts<C>) -> Self {
        Self {
            parts,
            progress: BootProgress::new(),
        }
    }

    pub fn stage(&self) -> BootStage {
        self.progress.stage()
    }

    /// Runs the startup sequence once. On success the mesh engine owns the
    /// radio, store and transport.
    pub async fn run(self) -> Result<RunningNode<C>, FatalBootError> {
        let Self {
            parts,
            mut progress,
        } = self;
        let NodeParts {
            mut board,
            mut storage,
            mut radio,
            mut store,
            mut mesh,
            mut link,
            mut sensors,
            mut display,
            rtc,
            mut clock,
        } = parts;

        if let Err(err) = board.begin() {
            log::error!("boot: board bring-up failed: {:?}", err);
            return Err(fatal(&progress, FatalCause::BoardBringUp));
        }
        let has_display = <C::Display as DisplaySlot>::PRESENCE.is_present() && display.begin();
        log::info!("boot: board up, display={}", has_display);

        let primary = match storage.mount_primary() {
            Ok(status) => status,
            Err(err) => {
                log::error!("boot: primary storage failed: {:?}", err);
                return Err(fatal(&progress, FatalCause::PrimaryStorage));
            }
        };
        let auxiliary = match storage.mount_auxiliary() {
            None => AuxiliaryStorage::NotBound,
            Some(Ok(status)) => AuxiliaryStorage::Mounted(status),
            Some(Err(err)) => {
                log::warn!("boot: auxiliary storage unavailable: {:?}", err);
                AuxiliaryStorage::Failed
            }
        };
        step(&mut progress, BootEvent::StorageMounted);

        if let Err(err) = radio.init() {
            log::error!("boot: radio init failed: {:?}", err);
            return Err(fatal(&progress, FatalCause::RadioInit));
        }
        step(&mut progress, BootEvent::RadioReady);

        let rng = SmallRng::seed_from_u64(u64::from(radio.rng_seed()));
        store.begin();
        mesh.begin(radio, store, rng, has_display);
        step(&mut progress, BootEvent::MeshStarted);

        let report = {
            let session = LinkSession {
                board: &mut board,
                clock: &mut clock,
                prefs: mesh.node_prefs(),
                ble_pin: mesh.ble_pin(),
            };
            link.bring_up(session).await
        };
        mesh.start_interface(link);
        step(&mut progress, BootEvent::TransportAttached);

        let sensors_ready = sensors.begin();
        if !sensors_ready {
            log::warn!("boot: sensors did not start");
        }
        if has_display {
            display.start_ui(mesh.node_prefs());
        }
        step(&mut progress, BootEvent::PeripheralsStarted);

        let report = BootReport {
            has_display,
            primary,
            auxiliary,
            sensors_ready,
            link: report,
        };
        log::info!(
            "boot: running, transport={} joined={}",
            report.link.kind.label(),
            report.link.is_joined()
        );

        Ok(RunningNode::new(
            board, mesh, sensors, display, rtc, clock, report,
        ))
    }
}

fn fatal(progress: &BootProgress, cause: FatalCause) -> FatalBootError {
    FatalBootError {
        stage: progress.stage(),
        cause,
    }
}

fn step(progress: &mut BootProgress, event: BootEvent) {
    if let Err(err) = progress.advance(event) {
        log::error!("boot: {}", err);
    }
}
