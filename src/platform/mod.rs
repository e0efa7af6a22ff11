//! ESP32 implementations of the board-level capabilities.

mod board;
mod clock;
mod flash;
#[cfg(feature = "esp32-wifi")]
pub mod wifi;

pub use board::EspBoard;
pub use clock::EmbassyClock;
pub use flash::{flash_backend, FlashBackend};
