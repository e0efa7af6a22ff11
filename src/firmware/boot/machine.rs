use statig::prelude::*;

use super::{progress::BootApplyStatus, BootEvent, BootStage};

#[derive(Clone, Copy, Debug)]
pub(super) struct BootMachine {
    pub(super) stage: BootStage,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: BootApplyStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: BootApplyStatus::Rejected,
        }
    }
}

impl BootMachine {
    pub(super) fn new() -> Self {
        Self {
            stage: BootStage::Uninitialized,
        }
    }

    fn advance(&mut self, context: &mut DispatchContext, stage: BootStage) {
        self.stage = stage;
        context.status = BootApplyStatus::Advanced;
    }
}

#[state_machine(initial = "State::uninitialized()")]
impl BootMachine {
    #[state]
    fn uninitialized(&mut self, context: &mut DispatchContext, event: &BootEvent) -> Outcome<State> {
        match event {
            BootEvent::StorageMounted => {
                self.advance(context, BootStage::StorageReady);
                Transition(State::storage_ready())
            }
            _ => Handled,
        }
    }

    #[state]
    fn storage_ready(&mut self, context: &mut DispatchContext, event: &BootEvent) -> Outcome<State> {
        match event {
            BootEvent::RadioReady => {
                self.advance(context, BootStage::RadioReady);
                Transition(State::radio_ready())
            }
            _ => Handled,
        }
    }

    #[state]
    fn radio_ready(&mut self, context: &mut DispatchContext, event: &BootEvent) -> Outcome<State> {
        match event {
            BootEvent::MeshStarted => {
                self.advance(context, BootStage::MeshReady);
                Transition(State::mesh_ready())
            }
            _ => Handled,
        }
    }

    #[state]
    fn mesh_ready(&mut self, context: &mut DispatchContext, event: &BootEvent) -> Outcome<State> {
        match event {
            BootEvent::TransportAttached => {
                self.advance(context, BootStage::TransportReady);
                Transition(State::transport_ready())
            }
            _ => Handled,
        }
    }

    #[state]
    fn transport_ready(
        &mut self,
        context: &mut DispatchContext,
        event: &BootEvent,
    ) -> Outcome<State> {
        match event {
            BootEvent::PeripheralsStarted => {
                self.advance(context, BootStage::Running);
                Transition(State::running())
            }
            _ => Handled,
        }
    }

    #[state]
    fn running(&mut self, context: &mut DispatchContext, event: &BootEvent) -> Outcome<State> {
        let _ = (context, event);
        Handled
    }
}
