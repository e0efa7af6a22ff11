use core::fmt;

use statig::blocking::IntoStateMachineExt as _;

use super::{
    machine::{BootMachine, DispatchContext},
    BootEvent, BootStage,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum BootApplyStatus {
    Advanced,
    Rejected,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BootOrderError {
    pub stage: BootStage,
    pub event: BootEvent,
}

impl fmt::Display for BootOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is out of order at {}", self.event, self.stage.label())
    }
}

/// Forward-only record of how far boot got.
pub struct BootProgress {
    machine: statig::blocking::StateMachine<BootMachine>,
}

impl BootProgress {
    pub fn new() -> Self {
        Self {
            machine: BootMachine::new().state_machine(),
        }
    }

    pub fn stage(&self) -> BootStage {
        self.machine.inner().stage
    }

    /// Applies `event`; an event that does not complete the current stage
    /// leaves the stage unchanged.
    pub fn advance(&mut self, event: BootEvent) -> Result<BootStage, BootOrderError> {
        let stage = self.stage();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        match context.status {
            BootApplyStatus::Advanced => Ok(self.stage()),
            BootApplyStatus::Rejected => Err(BootOrderError { stage, event }),
        }
    }
}

impl Default for BootProgress {
    fn default() -> Self {
        Self::new()
    }
}
