use super::{
    super::{
        capability::{Board, MonotonicClock, SerialPort},
        types::TransportKind,
    },
    CompanionLink, LinkReport, LinkSession, SerialLinkConfig,
};

pub struct SerialLink<P> {
    port: P,
    config: SerialLinkConfig,
}

impl<P: SerialPort> SerialLink<P> {
    pub fn new(port: P, config: SerialLinkConfig) -> Self {
        Self { port, config }
    }

    pub fn config(&self) -> SerialLinkConfig {
        self.config
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

impl<P: SerialPort> CompanionLink for SerialLink<P> {
    const KIND: TransportKind = TransportKind::Serial;

    async fn bring_up<B, K>(&mut self, _session: LinkSession<'_, B, K>) -> LinkReport
    where
        B: Board,
        K: MonotonicClock,
    {
        self.port.begin(self.config.baud, self.config.pins);
        match self.config.pins {
            Some(pins) => log::info!(
                "link: serial companion at {} baud, rx={} tx={}",
                self.config.baud,
                pins.rx,
                pins.tx
            ),
            None => log::info!("link: serial companion at {} baud", self.config.baud),
        }
        LinkReport::local(Self::KIND)
    }
}
