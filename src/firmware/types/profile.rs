#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageKind {
    /// Primary flash region only.
    Flash,
    /// Primary flash region plus an auxiliary region.
    FlashWithExtra,
}

impl StorageKind {
    pub const fn has_auxiliary(self) -> bool {
        match self {
            Self::Flash => false,
            Self::FlashWithExtra => true,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Flash => "flash",
            Self::FlashWithExtra => "flash+extra",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransportKind {
    Serial,
    Ble,
    Wifi,
}

impl TransportKind {
    pub const fn is_network(self) -> bool {
        match self {
            Self::Serial | Self::Ble => false,
            Self::Wifi => true,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Ble => "ble",
            Self::Wifi => "wifi",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DisplayPresence {
    Absent,
    Present,
}

impl DisplayPresence {
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Variant bound to every capability slot of this image. Descriptive only:
/// the binding itself happens through features and associated types.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BuildProfile {
    pub storage: StorageKind,
    pub transport: TransportKind,
    pub display: DisplayPresence,
}

impl BuildProfile {
    pub const fn from_features() -> Self {
        let storage = if cfg!(feature = "storage-flash-extra") {
            StorageKind::FlashWithExtra
        } else {
            StorageKind::Flash
        };
        let transport = if cfg!(feature = "transport-wifi") {
            TransportKind::Wifi
        } else if cfg!(feature = "transport-ble") {
            TransportKind::Ble
        } else {
            TransportKind::Serial
        };
        let display = if cfg!(feature = "display") {
            DisplayPresence::Present
        } else {
            DisplayPresence::Absent
        };
        Self {
            storage,
            transport,
            display,
        }
    }
}
