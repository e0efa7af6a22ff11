pub mod boot;
pub mod capability;
pub mod config;
pub mod network;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub(crate) mod testkit;
pub mod transport;
pub mod types;
