use embassy_futures::yield_now;

use super::super::{
    boot::BootReport,
    capability::{CapabilityBinding, DisplaySlot, MeshEngine, RtcClock, SensorHub},
};

/// Node after a successful boot: mesh engine with its transport attached,
/// plus the peripherals ticked beside it.
pub struct RunningNode<C: CapabilityBinding> {
    board: C::Board,
    mesh: C::Mesh,
    sensors: C::Sensors,
    display: C::Display,
    rtc: C::Rtc,
    clock: C::Clock,
    report: BootReport,
    iterations: u32,
}

impl<C: CapabilityBinding> RunningNode<C> {
    pub(crate) fn new(
        board: C::Board,
        mesh: C::Mesh,
        sensors: C::Sensors,
        display: C::Display,
        rtc: C::Rtc,
        clock: C::Clock,
        report: BootReport,
    ) -> Self {
        Self {
            board,
            mesh,
            sensors,
            display,
            rtc,
            clock,
            report,
            iterations: 0,
        }
    }

    /// One round: mesh engine, sensors, UI, clock.
    pub fn tick(&mut self) {
        self.mesh.poll();
        self.sensors.poll();
        if self.report.has_display {
            self.display.poll();
        }
        self.rtc.tick();
        self.iterations = self.iterations.wrapping_add(1);
    }

    pub async fn run_forever(mut self) -> ! {
        loop {
            self.tick();
            yield_now().await;
        }
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn mesh(&self) -> &C::Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut C::Mesh {
        &mut self.mesh
    }

    pub fn display(&self) -> &C::Display {
        &self.display
    }

    pub fn rtc(&self) -> &C::Rtc {
        &self.rtc
    }

    pub fn board_mut(&mut self) -> &mut C::Board {
        &mut self.board
    }

    pub fn clock_mut(&mut self) -> &mut C::Clock {
        &mut self.clock
    }
}
