mod join;
mod observer;
mod station;

pub use join::{join, JoinError};
pub use observer::{JoinObserver, LogJoinObserver};
pub use station::{DriverLink, StationAction, StationCycle};
