use core::fmt::{self, Debug};

use embedded_storage::Storage;

use super::MountStatus;

pub const REGION_HEADER_LEN: usize = 16;
const REGION_MAGIC: u32 = 0x4D43_4E52;
const REGION_VERSION: u8 = 1;

/// Flash window owned by one storage region.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegionLayout {
    pub offset: u32,
    pub size: u32,
}

impl RegionLayout {
    pub const fn end(self) -> u64 {
        self.offset as u64 + self.size as u64
    }

    fn fits(self, capacity: usize) -> bool {
        self.size as usize >= REGION_HEADER_LEN && self.end() <= capacity as u64
    }
}

/// Whether a mount may claim a region holding data it does not recognize.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MountRole {
    Primary,
    Auxiliary,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RegionError<E> {
    OutOfBounds { layout: RegionLayout, capacity: usize },
    Io(E),
    /// Auxiliary region holds data without a valid header.
    Foreign,
    /// Header read back after formatting did not match.
    VerifyFailed,
}

impl<E: Debug> fmt::Display for RegionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { layout, capacity } => write!(
                f,
                "region 0x{:X}+0x{:X} exceeds flash capacity 0x{:X}",
                layout.offset, layout.size, capacity
            ),
            Self::Io(error) => write!(f, "flash access failed: {:?}", error),
            Self::Foreign => f.write_str("region holds foreign data"),
            Self::VerifyFailed => f.write_str("header verify failed after format"),
        }
    }
}

/// Validates the header at the start of `layout`, formatting the region when
/// allowed by `role`.
pub fn mount_region<S: Storage>(
    flash: &mut S,
    layout: RegionLayout,
    role: MountRole,
) -> Result<MountStatus, RegionError<S::Error>> {
    let capacity = flash.capacity();
    if !layout.fits(capacity) {
        return Err(RegionError::OutOfBounds { layout, capacity });
    }

    let mut header = [0u8; REGION_HEADER_LEN];
    flash
        .read(layout.offset, &mut header)
        .map_err(RegionError::Io)?;

    if header_is_valid(&header, layout) {
        return Ok(MountStatus::Mounted);
    }
    let blank = header.iter().all(|&byte| byte == 0xFF);
    if role == MountRole::Auxiliary && !blank {
        return Err(RegionError::Foreign);
    }

    let fresh = encode_header(layout);
    flash.write(layout.offset, &fresh).map_err(RegionError::Io)?;
    flash
        .read(layout.offset, &mut header)
        .map_err(RegionError::Io)?;
    if header != fresh {
        return Err(RegionError::VerifyFailed);
    }
    Ok(MountStatus::Formatted)
}

fn encode_header(layout: RegionLayout) -> [u8; REGION_HEADER_LEN] {
    let mut header = [0xFFu8; REGION_HEADER_LEN];
    header[0..4].copy_from_slice(&REGION_MAGIC.to_le_bytes());
    header[4] = REGION_VERSION;
    header[8..12].copy_from_slice(&layout.size.to_le_bytes());
    header[REGION_HEADER_LEN - 1] = checksum8(&header[..REGION_HEADER_LEN - 1]);
    header
}

fn header_is_valid(header: &[u8; REGION_HEADER_LEN], layout: RegionLayout) -> bool {
    if u32::from_le_bytes([header[0], header[1], header[2], header[3]]) != REGION_MAGIC {
        return false;
    }
    if header[4] != REGION_VERSION {
        return false;
    }
    if u32::from_le_bytes([header[8], header[9], header[10], header[11]]) != layout.size {
        return false;
    }
    header[REGION_HEADER_LEN - 1] == checksum8(&header[..REGION_HEADER_LEN - 1])
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::testkit::MemFlash;

    const LAYOUT: RegionLayout = RegionLayout {
        offset: 0x1000,
        size: 0x1000,
    };

    #[test]
    fn blank_primary_is_formatted_then_mounted() {
        let mut flash = MemFlash::new(0x4000);

        let first = mount_region(&mut flash, LAYOUT, MountRole::Primary);
        let second = mount_region(&mut flash, LAYOUT, MountRole::Primary);

        assert_eq!(first, Ok(MountStatus::Formatted));
        assert_eq!(second, Ok(MountStatus::Mounted));
        assert_eq!(flash.writes(), 1);
    }

    #[test]
    fn corrupt_primary_header_is_reformatted() {
        let mut flash = MemFlash::new(0x4000);
        assert!(mount_region(&mut flash, LAYOUT, MountRole::Primary).is_ok());
        flash.poke(LAYOUT.offset + 4, 0x7F);

        let status = mount_region(&mut flash, LAYOUT, MountRole::Primary);

        assert_eq!(status, Ok(MountStatus::Formatted));
    }

    #[test]
    fn header_records_region_size() {
        let mut flash = MemFlash::new(0x4000);
        assert!(mount_region(&mut flash, LAYOUT, MountRole::Primary).is_ok());

        let resized = RegionLayout {
            offset: LAYOUT.offset,
            size: 0x2000,
        };
        let status = mount_region(&mut flash, resized, MountRole::Auxiliary);

        assert_eq!(status, Err(RegionError::Foreign));
    }

    #[test]
    fn auxiliary_never_formats_foreign_data() {
        let mut flash = MemFlash::new(0x4000);
        flash.poke(LAYOUT.offset, 0x00);

        let status = mount_region(&mut flash, LAYOUT, MountRole::Auxiliary);

        assert_eq!(status, Err(RegionError::Foreign));
        assert_eq!(flash.writes(), 0);
    }

    #[test]
    fn blank_auxiliary_is_formatted() {
        let mut flash = MemFlash::new(0x4000);

        let status = mount_region(&mut flash, LAYOUT, MountRole::Auxiliary);

        assert_eq!(status, Ok(MountStatus::Formatted));
    }

    #[test]
    fn out_of_bounds_layout_is_rejected_without_io() {
        let mut flash = MemFlash::new(0x1800);

        let status = mount_region(&mut flash, LAYOUT, MountRole::Primary);

        assert_eq!(
            status,
            Err(RegionError::OutOfBounds {
                layout: LAYOUT,
                capacity: 0x1800
            })
        );
        assert_eq!(flash.reads(), 0);
    }

    #[test]
    fn read_failure_is_reported() {
        let mut flash = MemFlash::new(0x4000).failing_reads();

        let status = mount_region(&mut flash, LAYOUT, MountRole::Primary);

        assert_eq!(status, Err(RegionError::Io("read failed")));
    }

    #[test]
    fn dropped_write_fails_verification() {
        let mut flash = MemFlash::new(0x4000).dropping_writes();

        let status = mount_region(&mut flash, LAYOUT, MountRole::Primary);

        assert_eq!(status, Err(RegionError::VerifyFailed));
    }

    #[test]
    fn checksum_seed_and_rotation() {
        assert_eq!(checksum8(&[]), 0x5A);
        assert_eq!(checksum8(&[0x80]), 0x5A ^ 0x01);
    }
}
