mod backend;
mod region;

pub use backend::RegionStorageBackend;
pub use region::{mount_region, MountRole, RegionError, RegionLayout, REGION_HEADER_LEN};

/// How a storage region came up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MountStatus {
    /// A valid header was already present.
    Mounted,
    /// The region was blank or invalid and a fresh header was written.
    Formatted,
}
