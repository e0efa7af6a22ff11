//! WiFi station over `esp-radio` with an `embassy-net` DHCP stack.

use core::fmt;

use embassy_net::{Runner, Stack, StackResources};
use embassy_time::{with_timeout, Duration, Instant};
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config as WifiRuntimeConfig, ModeConfig, PowerSaveMode,
    ScanMethod, WifiController, WifiDevice, WifiError,
};
use heapless::{String, Vec};
use static_cell::StaticCell;

use crate::firmware::{
    capability::NetworkStack,
    network::{DriverLink, StationAction, StationCycle},
    types::{JoinedNetwork, LinkStatus, NetworkCandidate, NETWORK_CANDIDATES_MAX},
};

const WIFI_HEAP_BYTES: usize = 72 * 1024;
const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 2;
/// Upper bound on a single driver start or disconnect inside a poll.
const DRIVER_STEP_MS: u64 = 2_000;
/// How long one candidate may stay associating before the next is tried.
const ATTEMPT_BUDGET_MS: u64 = 10_000;

pub struct WifiRuntime {
    pub stack: EspWifiStack,
    pub net_runner: Runner<'static, WifiDevice<'static>>,
}

#[derive(Debug)]
pub enum EspWifiError {
    Radio(WifiError),
    TooManyCandidates,
}

impl fmt::Display for EspWifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(err) => write!(f, "wifi driver error: {:?}", err),
            Self::TooManyCandidates => {
                write!(f, "at most {} networks can be registered", NETWORK_CANDIDATES_MAX)
            }
        }
    }
}

impl From<WifiError> for EspWifiError {
    fn from(err: WifiError) -> Self {
        Self::Radio(err)
    }
}

/// Brings up the radio controller and the network stack. The returned
/// runner must be spawned with [`net_task`] before joining.
pub fn setup(wifi: esp_hal::peripherals::WIFI<'static>) -> Result<WifiRuntime, &'static str> {
    esp_alloc::heap_allocator!(size: WIFI_HEAP_BYTES);

    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|err| {
        log::error!("wifi: esp_radio::init err={:?}", err);
        "wifi: radio init failed"
    })?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let runtime_config = WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE);
    let (controller, ifaces) =
        esp_radio::wifi::new(radio_ctrl, wifi, runtime_config).map_err(|err| {
            log::error!("wifi: controller init err={:?}", err);
            "wifi: controller init failed"
        })?;

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    Ok(WifiRuntime {
        stack: EspWifiStack::new(controller, stack),
        net_runner,
    })
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Station that works through the registered networks one at a time, with
/// one background association in flight across polls.
pub struct EspWifiStack {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    candidates: Vec<(String<32>, String<64>), NETWORK_CANDIDATES_MAX>,
    cycle: StationCycle,
}

impl EspWifiStack {
    fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self {
            controller,
            stack,
            candidates: Vec::new(),
            cycle: StationCycle::new(ATTEMPT_BUDGET_MS),
        }
    }

    pub fn net_stack(&self) -> Stack<'static> {
        self.stack
    }

    fn driver_link(&self) -> DriverLink {
        match self.controller.is_connected() {
            Ok(true) => DriverLink::Associated,
            Ok(false) => DriverLink::Associating,
            Err(_) => DriverLink::Failed,
        }
    }

    async fn begin_attempt(&mut self, index: usize) -> Result<(), ()> {
        let Some((ssid, password)) = self.candidates.get(index) else {
            return Err(());
        };

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::Wpa2Personal
        };
        let client = ClientConfig::default()
            .with_ssid(ssid.as_str().into())
            .with_password(password.as_str().into())
            .with_auth_method(auth_method)
            .with_scan_method(ScanMethod::AllChannels);
        if let Err(err) = self.controller.set_config(&ModeConfig::Client(client)) {
            log::warn!("wifi: station config err={:?}", err);
            return Err(());
        }

        if !matches!(self.controller.is_started(), Ok(true)) {
            let step = Duration::from_millis(DRIVER_STEP_MS);
            match with_timeout(step, self.controller.start_async()).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    log::warn!("wifi: start err={:?}", err);
                    return Err(());
                }
                Err(_) => {
                    log::warn!("wifi: start timed out");
                    return Err(());
                }
            }
        }

        if let Err(err) = self.controller.connect() {
            log::warn!("wifi: connect err={:?}", err);
            return Err(());
        }
        log::debug!("wifi: associating with AP[{}]", index + 1);
        Ok(())
    }

    async fn disconnect(&mut self) {
        let step = Duration::from_millis(DRIVER_STEP_MS);
        if with_timeout(step, self.controller.disconnect_async())
            .await
            .is_err()
        {
            log::warn!("wifi: disconnect timed out");
        }
    }
}

impl NetworkStack for EspWifiStack {
    type Error = EspWifiError;

    fn prepare_station(&mut self) -> Result<(), Self::Error> {
        self.controller.set_power_saving(PowerSaveMode::None)?;
        self.candidates.clear();
        self.cycle.reset(0);
        Ok(())
    }

    fn register(&mut self, candidate: &NetworkCandidate<'_>) -> Result<(), Self::Error> {
        let mut ssid = String::new();
        let mut password = String::new();
        ssid.push_str(candidate.ssid)
            .map_err(|_| EspWifiError::Radio(WifiError::InvalidArguments))?;
        password
            .push_str(candidate.password)
            .map_err(|_| EspWifiError::Radio(WifiError::InvalidArguments))?;
        self.candidates
            .push((ssid, password))
            .map_err(|_| EspWifiError::TooManyCandidates)?;
        self.cycle.reset(self.candidates.len());
        Ok(())
    }

    async fn poll_status(&mut self) -> LinkStatus {
        let action = self
            .cycle
            .poll(self.driver_link(), Instant::now().as_millis());
        match action {
            StationAction::Connect(index) => {
                if self.begin_attempt(index).await.is_err() {
                    self.disconnect().await;
                    self.cycle.abandon();
                    return LinkStatus::ConnectFailed;
                }
            }
            StationAction::GiveUp(index) | StationAction::Lost(index) => {
                log::debug!(
                    "wifi: leaving AP[{}] status={}",
                    index + 1,
                    action.status().code()
                );
                self.disconnect().await;
            }
            StationAction::Wait | StationAction::Connected | StationAction::NoCandidates => {}
        }
        action.status()
    }

    fn joined(&self) -> Option<JoinedNetwork> {
        let (ssid, _) = self.candidates.get(self.cycle.associated()?)?;
        let config = self.stack.config_v4()?;
        let mut name = String::new();
        name.push_str(ssid).ok()?;
        Some(JoinedNetwork {
            ssid: name,
            address: config.address.address(),
            rssi_dbm: None,
        })
    }
}
