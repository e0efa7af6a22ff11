use core::fmt::Debug;

use embedded_storage::Storage;

use super::{
    super::capability::StorageBackend,
    region::{mount_region, MountRole, RegionError, RegionLayout},
    MountStatus,
};

/// Storage backend over one flash device: a primary region and, on the
/// extra-storage variant, an auxiliary one.
pub struct RegionStorageBackend<S> {
    flash: S,
    primary: RegionLayout,
    auxiliary: Option<RegionLayout>,
}

impl<S: Storage> RegionStorageBackend<S> {
    pub fn new(flash: S, primary: RegionLayout) -> Self {
        Self {
            flash,
            primary,
            auxiliary: None,
        }
    }

    pub fn with_auxiliary(mut self, auxiliary: RegionLayout) -> Self {
        self.auxiliary = Some(auxiliary);
        self
    }

    pub fn primary(&self) -> RegionLayout {
        self.primary
    }

    pub fn auxiliary(&self) -> Option<RegionLayout> {
        self.auxiliary
    }

    pub fn into_inner(self) -> S {
        self.flash
    }
}

impl<S> StorageBackend for RegionStorageBackend<S>
where
    S: Storage,
    S::Error: Debug,
{
    type Error = RegionError<S::Error>;

    fn mount_primary(&mut self) -> Result<MountStatus, Self::Error> {
        let status = mount_region(&mut self.flash, self.primary, MountRole::Primary)?;
        log::info!(
            "storage: primary 0x{:X}+0x{:X} {:?}",
            self.primary.offset,
            self.primary.size,
            status
        );
        Ok(status)
    }

    fn mount_auxiliary(&mut self) -> Option<Result<MountStatus, Self::Error>> {
        let layout = self.auxiliary?;
        Some(mount_region(&mut self.flash, layout, MountRole::Auxiliary))
    }
}
