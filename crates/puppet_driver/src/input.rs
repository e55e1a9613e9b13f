use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Abstract inputs the bundled archetypes react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Upper-body action: magic shot, sword slash.
    Attack,
    Jump,
    Crouch,
}

/// Held-action snapshot for the current and previous frame.
///
/// The host polls its devices, calls [`begin_frame`](Self::begin_frame)
/// and then [`set`](Self::set) for each action before stepping characters.
#[derive(Debug, Clone)]
pub struct InputState<A: Copy + Eq + Hash = Action> {
    held: FxHashSet<A>,
    previous: FxHashSet<A>,
}

impl<A: Copy + Eq + Hash> Default for InputState<A> {
    fn default() -> Self {
        Self {
            held: FxHashSet::default(),
            previous: FxHashSet::default(),
        }
    }
}

impl<A: Copy + Eq + Hash> InputState<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rolls the current held set into the previous-frame set.
    pub fn begin_frame(&mut self) {
        self.previous.clone_from(&self.held);
    }

    pub fn press(&mut self, action: A) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: A) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: A, down: bool) {
        if down {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self, action: A) -> bool {
        self.held.contains(&action)
    }

    /// Held now, not held on the previous frame.
    #[must_use]
    pub fn just_pressed(&self, action: A) -> bool {
        self.held.contains(&action) && !self.previous.contains(&action)
    }

    #[must_use]
    pub fn just_released(&self, action: A) -> bool {
        !self.held.contains(&action) && self.previous.contains(&action)
    }
}
