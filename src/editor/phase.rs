use crate::error::{EditorError, EditorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorPhase {
    #[default]
    Uninitialized,
    /// Waiting for the record of an existing student.
    Loading,
    Ready(EditorMode),
    Closed,
}

impl EditorPhase {
    pub const fn mode(self) -> Option<EditorMode> {
        match self {
            Self::Loading => Some(EditorMode::Edit),
            Self::Ready(mode) => Some(mode),
            Self::Uninitialized | Self::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    ResolveCreate,
    ResolveEdit,
    RecordSettled,
    Deactivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: EditorPhase,
    pub event: PhaseEvent,
    pub to: EditorPhase,
}

#[derive(Debug, Default)]
pub struct PhaseMachine {
    phase: EditorPhase,
    history: Vec<PhaseTransition>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }

    pub fn next_phase(&self, event: PhaseEvent) -> Option<EditorPhase> {
        use PhaseEvent::{Deactivate, RecordSettled, ResolveCreate, ResolveEdit};
        match (self.phase, event) {
            (EditorPhase::Closed, _) => None,
            (_, ResolveCreate) => Some(EditorPhase::Ready(EditorMode::Create)),
            (_, ResolveEdit) => Some(EditorPhase::Loading),
            (EditorPhase::Loading, RecordSettled) => Some(EditorPhase::Ready(EditorMode::Edit)),
            (_, Deactivate) => Some(EditorPhase::Closed),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: PhaseEvent) -> EditorResult<EditorPhase> {
        trace!(from = ?self.phase, ?event, "request editor transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            warn!(?from, ?event, "invalid editor transition requested");
            EditorError::InvalidTransition { from, event }
        })?;

        self.history.push(PhaseTransition {
            from: self.phase,
            event,
            to: next,
        });
        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_route_is_ready_immediately() {
        let mut machine = PhaseMachine::new();
        let phase = machine
            .transition(PhaseEvent::ResolveCreate)
            .expect("uninitialized -> create should work");

        assert_eq!(phase, EditorPhase::Ready(EditorMode::Create));
        assert_eq!(phase.mode(), Some(EditorMode::Create));
    }

    #[test]
    fn edit_route_loads_then_settles() {
        let mut machine = PhaseMachine::new();
        let _ = machine
            .transition(PhaseEvent::ResolveEdit)
            .expect("resolve edit should work");
        assert_eq!(machine.phase(), EditorPhase::Loading);
        assert_eq!(machine.phase().mode(), Some(EditorMode::Edit));

        let _ = machine
            .transition(PhaseEvent::RecordSettled)
            .expect("loading -> ready should work");

        assert_eq!(machine.phase(), EditorPhase::Ready(EditorMode::Edit));
        assert_eq!(
            machine.history(),
            &[
                PhaseTransition {
                    from: EditorPhase::Uninitialized,
                    event: PhaseEvent::ResolveEdit,
                    to: EditorPhase::Loading,
                },
                PhaseTransition {
                    from: EditorPhase::Loading,
                    event: PhaseEvent::RecordSettled,
                    to: EditorPhase::Ready(EditorMode::Edit),
                },
            ]
        );
    }

    #[test]
    fn settling_outside_loading_is_rejected_without_history() {
        let mut machine = PhaseMachine::new();
        let err = machine
            .transition(PhaseEvent::RecordSettled)
            .expect_err("nothing is loading");

        assert!(matches!(
            err,
            EditorError::InvalidTransition {
                from: EditorPhase::Uninitialized,
                event: PhaseEvent::RecordSettled
            }
        ));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn closed_accepts_nothing() {
        let mut machine = PhaseMachine::new();
        let _ = machine
            .transition(PhaseEvent::Deactivate)
            .expect("deactivate should work");

        for event in [
            PhaseEvent::ResolveCreate,
            PhaseEvent::ResolveEdit,
            PhaseEvent::RecordSettled,
            PhaseEvent::Deactivate,
        ] {
            assert!(machine.next_phase(event).is_none());
        }
        assert_eq!(machine.phase().mode(), None);
    }
}
