//! Playback State Machine
//!
//! A character archetype is a [`TransitionTable`]: a set of states, each
//! with a [`StateSpec`], and an ordered list of transitions per state. A
//! transition maps `(state, trigger)` to a target state and a
//! [`SessionSetup`] closure that builds the next [`BlendSession`].
//!
//! The table is immutable and shared; each character runs its own
//! [`StateMachine`] over it.
//!
//! # Frame order
//!
//! [`StateMachine::step`] runs once per frame, before the animator advances:
//! 1. Ramp states add the blend step to the session factor. When it reaches
//!    1 only `BlendComplete` transitions are considered.
//! 2. Otherwise the state's transitions are checked in declaration order;
//!    the first whose trigger fires and whose setup succeeds is taken.
//!
//! At most one transition is taken per frame, and a taken transition issues
//! exactly one `set_session` call. A setup that returns `None` (a clip it
//! needs is not loaded) skips the transition and leaves state and session
//! untouched.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use puppet_animation::{AnimationClip, Animator, BlendSession, BoneMask, ClipSlot};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{DriverError, Result};
use crate::input::InputState;
use crate::library::ClipLibrary;
use crate::ramp::BlendRate;

/// Requirements for state identifiers.
pub trait StateId: Copy + Eq + Hash + Debug + Send + Sync + 'static {}
impl<T: Copy + Eq + Hash + Debug + Send + Sync + 'static> StateId for T {}

/// Requirements for input action identifiers.
pub trait ActionId: Copy + Eq + Hash + Debug + Send + Sync + 'static {}
impl<T: Copy + Eq + Hash + Debug + Send + Sync + 'static> ActionId for T {}

/// Condition that fires a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger<A> {
    /// Action is down this frame.
    Held(A),
    /// Action is up this frame.
    Released(A),
    /// Action went down this frame.
    JustPressed(A),
    /// Primary clip progress reached the normalized threshold, or the primary
    /// cursor wrapped during the last advance.
    Progress(f32),
    /// The ramp of the current state saturated at 1.
    BlendComplete,
}

impl<A: ActionId> Trigger<A> {
    fn fires(&self, input: &InputState<A>, animator: &Animator) -> bool {
        match *self {
            Trigger::Held(action) => input.is_held(action),
            Trigger::Released(action) => !input.is_held(action),
            Trigger::JustPressed(action) => input.just_pressed(action),
            Trigger::Progress(threshold) => animator
                .session()
                .primary
                .as_ref()
                .is_some_and(|slot| slot.progress() >= threshold || slot.looped()),
            Trigger::BlendComplete => false,
        }
    }
}

/// What a [`SessionSetup`] can read: the character's clips and its animator
/// as it stands before the transition.
pub struct SetupContext<'a> {
    pub clips: &'a ClipLibrary,
    pub animator: &'a Animator,
}

impl SetupContext<'_> {
    #[must_use]
    pub fn clip(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name)
    }

    #[must_use]
    pub fn primary_time(&self) -> f32 {
        self.animator.primary_time()
    }

    #[must_use]
    pub fn secondary_time(&self) -> f32 {
        self.animator.secondary_time()
    }

    #[must_use]
    pub fn lower_time(&self) -> f32 {
        self.animator.lower_time()
    }

    /// Current primary slot, cursor included.
    #[must_use]
    pub fn primary_slot(&self) -> Option<ClipSlot> {
        self.animator.session().primary.clone()
    }

    #[must_use]
    pub fn secondary_slot(&self) -> Option<ClipSlot> {
        self.animator.session().secondary.clone()
    }

    /// Current lower slot, carried into the next session so the lower-body
    /// cycle continues uninterrupted.
    #[must_use]
    pub fn lower_slot(&self) -> Option<ClipSlot> {
        self.animator.session().lower.clone()
    }

    /// `name` running from `time`.
    #[must_use]
    pub fn slot(&self, name: &str, time: f32) -> Option<ClipSlot> {
        self.clip(name).map(|clip| ClipSlot::new(clip, time))
    }

    /// `name` held at `time`.
    #[must_use]
    pub fn paused_slot(&self, name: &str, time: f32) -> Option<ClipSlot> {
        self.clip(name).map(|clip| ClipSlot::paused(clip, time))
    }
}

/// Builds the session a transition installs, or `None` to skip it.
pub type SessionSetup = Box<dyn Fn(&SetupContext<'_>) -> Option<BlendSession> + Send + Sync>;

pub struct Transition<S, A> {
    pub trigger: Trigger<A>,
    pub target: S,
    pub label: &'static str,
    setup: SessionSetup,
}

impl<S: Debug, A: Debug> Debug for Transition<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("trigger", &self.trigger)
            .field("target", &self.target)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Per-state behaviour.
#[derive(Debug, Clone, Default)]
pub struct StateSpec {
    /// Advance the session blend factor every frame.
    pub ramp: bool,
    /// Bones pinned to the lower slot while in this state.
    pub mask: Option<BoneMask>,
}

impl StateSpec {
    /// Plays whatever the entering transition installed.
    #[must_use]
    pub fn steady() -> Self {
        Self::default()
    }

    /// Cross-fades towards the secondary slot.
    #[must_use]
    pub fn ramp() -> Self {
        Self {
            ramp: true,
            mask: None,
        }
    }

    #[must_use]
    pub fn with_mask(mut self, mask: BoneMask) -> Self {
        self.mask = Some(mask);
        self
    }
}

type TransitionList<S, A> = SmallVec<[Transition<S, A>; 4]>;

/// Immutable state graph of one archetype.
#[derive(Debug)]
pub struct TransitionTable<S, A> {
    states: FxHashMap<S, StateSpec>,
    transitions: FxHashMap<S, TransitionList<S, A>>,
}

impl<S: StateId, A: ActionId> TransitionTable<S, A> {
    #[must_use]
    pub fn builder() -> TransitionTableBuilder<S, A> {
        TransitionTableBuilder {
            states: FxHashMap::default(),
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn spec(&self, state: S) -> Option<&StateSpec> {
        self.states.get(&state)
    }

    #[must_use]
    pub fn contains(&self, state: S) -> bool {
        self.states.contains_key(&state)
    }

    /// Outgoing transitions of `state` in declaration order.
    #[must_use]
    pub fn transitions(&self, state: S) -> &[Transition<S, A>] {
        self.transitions
            .get(&state)
            .map(|list| list.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

pub struct TransitionTableBuilder<S, A> {
    states: FxHashMap<S, StateSpec>,
    transitions: Vec<(S, Transition<S, A>)>,
}

impl<S: StateId, A: ActionId> TransitionTableBuilder<S, A> {
    #[must_use]
    pub fn state(mut self, state: S, spec: StateSpec) -> Self {
        self.states.insert(state, spec);
        self
    }

    /// Declares `from --trigger--> target`, installing the session built by
    /// `setup`.
    #[must_use]
    pub fn on<F>(mut self, from: S, trigger: Trigger<A>, target: S, label: &'static str, setup: F) -> Self
    where
        F: Fn(&SetupContext<'_>) -> Option<BlendSession> + Send + Sync + 'static,
    {
        self.transitions.push((
            from,
            Transition {
                trigger,
                target,
                label,
                setup: Box::new(setup),
            },
        ));
        self
    }

    /// Fails if a transition starts or ends in an undeclared state.
    pub fn build(self) -> Result<TransitionTable<S, A>> {
        let mut transitions: FxHashMap<S, TransitionList<S, A>> = FxHashMap::default();
        for (from, transition) in self.transitions {
            for state in [from, transition.target] {
                if !self.states.contains_key(&state) {
                    return Err(DriverError::UnknownState(format!(
                        "{state:?} (transition '{}')",
                        transition.label
                    )));
                }
            }
            transitions.entry(from).or_default().push(transition);
        }
        Ok(TransitionTable {
            states: self.states,
            transitions,
        })
    }
}

/// One character's position in a [`TransitionTable`].
#[derive(Debug, Clone)]
pub struct StateMachine<S, A> {
    table: Arc<TransitionTable<S, A>>,
    current: S,
    blend_rate: BlendRate,
    transition_count: u64,
}

impl<S: StateId, A: ActionId> StateMachine<S, A> {
    /// Enters `initial` without running any transition.
    pub fn new(table: Arc<TransitionTable<S, A>>, initial: S, blend_rate: BlendRate) -> Result<Self> {
        if !table.contains(initial) {
            return Err(DriverError::UnknownState(format!("{initial:?}")));
        }
        if blend_rate.is_frame_locked() {
            log::warn!(
                "Blend rate {:?} is frame-locked: fade duration depends on frame rate",
                blend_rate
            );
        }
        Ok(Self {
            table,
            current: initial,
            blend_rate,
            transition_count: 0,
        })
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> S {
        self.current
    }

    #[must_use]
    pub fn table(&self) -> &Arc<TransitionTable<S, A>> {
        &self.table
    }

    #[must_use]
    pub fn blend_rate(&self) -> BlendRate {
        self.blend_rate
    }

    /// Transitions taken since creation.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Bone mask of the current state.
    #[must_use]
    pub fn active_mask(&self) -> Option<&BoneMask> {
        self.table.spec(self.current)?.mask.as_ref()
    }

    /// Evaluates one frame. Returns the new state if a transition was taken.
    pub fn step(
        &mut self,
        dt: f32,
        input: &InputState<A>,
        clips: &ClipLibrary,
        animator: &mut Animator,
    ) -> Option<S> {
        let table = Arc::clone(&self.table);
        let transitions = table.transitions(self.current);
        let ramping = table.spec(self.current).is_some_and(|spec| spec.ramp);

        if ramping {
            animator.set_blend_factor(animator.blend_factor() + self.blend_rate.step(dt));
            log::trace!("{:?} blend factor {:.3}", self.current, animator.blend_factor());

            if animator.blend_factor() >= 1.0 {
                for transition in transitions {
                    if matches!(transition.trigger, Trigger::BlendComplete) {
                        if let Some(state) = self.take(transition, clips, animator) {
                            return Some(state);
                        }
                    }
                }
                return None;
            }
        }

        for transition in transitions {
            if transition.trigger.fires(input, animator) {
                if let Some(state) = self.take(transition, clips, animator) {
                    return Some(state);
                }
            }
        }
        None
    }

    fn take(&mut self, transition: &Transition<S, A>, clips: &ClipLibrary, animator: &mut Animator) -> Option<S> {
        let session = {
            let ctx = SetupContext {
                clips,
                animator: &*animator,
            };
            (transition.setup)(&ctx)
        };

        let Some(session) = session else {
            log::warn!(
                "Skipping transition '{}' {:?} -> {:?}: required clip not loaded",
                transition.label,
                self.current,
                transition.target
            );
            return None;
        };

        log::debug!(
            "Transition '{}' {:?} -> {:?} (blend {:.2})",
            transition.label,
            self.current,
            transition.target,
            session.blend_factor()
        );
        animator.set_session(session);
        self.current = transition.target;
        self.transition_count += 1;
        Some(self.current)
    }
}
