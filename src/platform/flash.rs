use esp_storage::FlashStorage;

use crate::firmware::{config, storage::RegionStorageBackend};

pub type FlashBackend<'d> = RegionStorageBackend<FlashStorage<'d>>;

/// Storage backend over the internal SPI flash with the configured regions.
pub fn flash_backend(flash_peripheral: esp_hal::peripherals::FLASH<'_>) -> FlashBackend<'_> {
    let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
    let backend = RegionStorageBackend::new(flash, config::PRIMARY_REGION);
    #[cfg(feature = "storage-flash-extra")]
    let backend = backend.with_auxiliary(config::AUXILIARY_REGION);
    backend
}
