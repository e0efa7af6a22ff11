use super::{
    super::{
        capability::{Board, MonotonicClock, NetworkStack, TcpServer},
        network::{join, JoinObserver, LogJoinObserver},
        types::{JoinPolicy, NetworkCandidate, TransportKind},
    },
    CompanionLink, LinkReport, LinkSession,
};

/// WiFi station plus TCP listener. Bring-up makes one bounded join attempt
/// and starts listening whatever its outcome.
pub struct WifiLink<'c, S, T, O = LogJoinObserver> {
    stack: S,
    server: T,
    candidates: &'c [NetworkCandidate<'c>],
    policy: JoinPolicy,
    port: u16,
    observer: O,
}

impl<'c, S, T> WifiLink<'c, S, T>
where
    S: NetworkStack,
    T: TcpServer,
{
    pub fn new(
        stack: S,
        server: T,
        candidates: &'c [NetworkCandidate<'c>],
        policy: JoinPolicy,
        port: u16,
    ) -> Self {
        Self {
            stack,
            server,
            candidates,
            policy,
            port,
            observer: LogJoinObserver,
        }
    }
}

impl<'c, S, T, O> WifiLink<'c, S, T, O>
where
    S: NetworkStack,
    T: TcpServer,
    O: JoinObserver,
{
    pub fn with_observer<P: JoinObserver>(self, observer: P) -> WifiLink<'c, S, T, P> {
        WifiLink {
            stack: self.stack,
            server: self.server,
            candidates: self.candidates,
            policy: self.policy,
            port: self.port,
            observer,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    pub fn server_mut(&mut self) -> &mut T {
        &mut self.server
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<S, T, O> CompanionLink for WifiLink<'_, S, T, O>
where
    S: NetworkStack,
    T: TcpServer,
    O: JoinObserver,
{
    const KIND: TransportKind = TransportKind::Wifi;

    async fn bring_up<B, K>(&mut self, session: LinkSession<'_, B, K>) -> LinkReport
    where
        B: Board,
        K: MonotonicClock,
    {
        session.board.set_inhibit_sleep(true);

        log::info!("WiFi companion mode");
        for candidate in self.candidates {
            log::info!("AP[{}] SSID: {}", candidate.ordinal(), candidate.ssid);
        }
        log::info!("AP count: {}", self.candidates.len());
        log::info!("TCP port: {}", self.port);

        let attempt = join(
            &mut self.stack,
            self.candidates,
            self.policy,
            session.clock,
            &mut self.observer,
        )
        .await;
        let join = match attempt {
            Ok(result) => Some(result),
            Err(err) => {
                log::warn!("join: {}", err);
                None
            }
        };

        self.server.begin(self.port);
        log::info!("TCP server listening on {}", self.port);

        LinkReport {
            kind: Self::KIND,
            join,
        }
    }
}
