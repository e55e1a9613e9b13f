use std::sync::Arc;

use puppet_animation::{Animator, BlendSession};

use crate::input::InputState;
use crate::library::ClipLibrary;
use crate::machine::{ActionId, StateId, StateMachine};

/// An animated character: its animator, its state machine and the clips it
/// can play.
#[derive(Debug, Clone)]
pub struct Character<S, A> {
    pub name: String,
    animator: Animator,
    machine: StateMachine<S, A>,
    clips: Arc<ClipLibrary>,
}

impl<S: StateId, A: ActionId> Character<S, A> {
    /// Assembles a character and installs `initial_session`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mut animator: Animator,
        machine: StateMachine<S, A>,
        clips: Arc<ClipLibrary>,
        initial_session: Option<BlendSession>,
    ) -> Self {
        let name = name.into();
        match initial_session {
            Some(session) => animator.set_session(session),
            None => log::warn!("Character '{name}' starts without a clip; it will hold its bind pose"),
        }
        Self {
            name,
            animator,
            machine,
            clips,
        }
    }

    /// Runs one frame: state machine first, then a single animator advance.
    pub fn update(&mut self, dt: f32, input: &InputState<A>) -> Option<S> {
        let changed = self.machine.step(dt, input, &self.clips, &mut self.animator);
        self.animator.update(dt, self.machine.active_mask());
        changed
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> S {
        self.machine.current()
    }

    #[inline]
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[must_use]
    pub fn machine(&self) -> &StateMachine<S, A> {
        &self.machine
    }

    #[must_use]
    pub fn clips(&self) -> &Arc<ClipLibrary> {
        &self.clips
    }
}

/// Object-safe view of a character, so one context can hold different
/// archetypes driven by the same action type.
pub trait Controller<A: ActionId>: Send + Sync {
    fn name(&self) -> &str;

    fn update(&mut self, dt: f32, input: &InputState<A>);

    fn animator(&self) -> &Animator;

    /// Debug name of the current state.
    fn state_label(&self) -> String;
}

impl<S: StateId, A: ActionId> Controller<A> for Character<S, A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f32, input: &InputState<A>) {
        Character::update(self, dt, input);
    }

    fn animator(&self) -> &Animator {
        &self.animator
    }

    fn state_label(&self) -> String {
        format!("{:?}", self.state())
    }
}
