mod main_loop;
mod rtc;

pub use main_loop::RunningNode;
pub use rtc::{VolatileRtc, RTC_EPOCH_DEFAULT};

use super::{
    boot::{BootSequencer, NodeParts},
    capability::{binding_matches_profile, CapabilityBinding},
    config::BUILD_PROFILE,
};

pub fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

/// Boots the node, halting the device on an unrecoverable failure.
pub async fn boot_or_halt<C: CapabilityBinding>(parts: NodeParts<C>) -> RunningNode<C> {
    const {
        assert!(
            binding_matches_profile::<C>(BUILD_PROFILE),
            "display or transport binding disagrees with the enabled features"
        )
    };
    match BootSequencer::new(parts).run().await {
        Ok(node) => node,
        Err(err) => {
            log::error!("boot: halted: {}", err);
            halt_forever()
        }
    }
}

/// Composition root entry: boot, then service the node forever.
pub async fn run_node<C: CapabilityBinding>(parts: NodeParts<C>) -> ! {
    boot_or_halt(parts).await.run_forever().await
}
