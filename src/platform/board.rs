use core::convert::Infallible;

use crate::firmware::{capability::Board, config};

/// Console and power facilities of the ESP32 board.
#[derive(Default)]
pub struct EspBoard {
    sleep_inhibited: bool,
}

impl EspBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleep_inhibited(&self) -> bool {
        self.sleep_inhibited
    }
}

impl Board for EspBoard {
    type Error = Infallible;

    fn begin(&mut self) -> Result<(), Self::Error> {
        esp_println::logger::init_logger(config::CONSOLE_LOG_LEVEL);
        log::info!(
            "boot: {} storage, {} transport, console {} baud",
            config::BUILD_PROFILE.storage.label(),
            config::BUILD_PROFILE.transport.label(),
            config::CONSOLE_BAUD
        );
        Ok(())
    }

    fn set_inhibit_sleep(&mut self, inhibit: bool) {
        if self.sleep_inhibited != inhibit {
            log::debug!("board: light sleep {}", if inhibit { "off" } else { "on" });
        }
        self.sleep_inhibited = inhibit;
    }
}
