//! Boot choreography and main poll loop of a mesh-radio companion node.
//!
//! The crate wires externally supplied collaborators (mesh engine, radio
//! driver, data store, companion transport, peripherals) together in a
//! fixed order and then pumps them forever. Which implementation fills each
//! capability slot is decided by Cargo features at build time; the values
//! for the selected variants come from `config/node.toml`, compiled by
//! `build.rs`.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

#[cfg(all(feature = "storage-flash", feature = "storage-flash-extra"))]
compile_error!("Only one storage backend feature can be enabled at a time");

#[cfg(not(any(feature = "storage-flash", feature = "storage-flash-extra")))]
compile_error!("One storage backend feature must be enabled");

#[cfg(any(
    all(feature = "transport-serial", feature = "transport-ble"),
    all(feature = "transport-serial", feature = "transport-wifi"),
    all(feature = "transport-ble", feature = "transport-wifi"),
))]
compile_error!("Only one companion transport feature can be enabled at a time");

#[cfg(not(any(
    feature = "transport-serial",
    feature = "transport-ble",
    feature = "transport-wifi"
)))]
compile_error!("One companion transport feature must be enabled");

pub mod firmware;
#[cfg(feature = "esp32")]
pub mod platform;

pub use firmware::{
    boot::{BootReport, BootSequencer, BootStage, FatalBootError, NodeParts},
    capability::CapabilityBinding,
    config::BUILD_PROFILE,
    network::{join, JoinObserver, LogJoinObserver},
    runtime::{boot_or_halt, halt_forever, run_node, RunningNode},
};
