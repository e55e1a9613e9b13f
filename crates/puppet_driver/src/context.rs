use puppet_animation::Animator;
use slotmap::{SlotMap, new_key_type};

use crate::character::Controller;
use crate::input::{Action, InputState};
use crate::machine::ActionId;

new_key_type! {
    /// Handle to a character owned by a [`SimulationContext`].
    pub struct CharacterKey;
}

/// Per-frame simulation state owned by the top-level loop.
///
/// Holds every animated character, the frame counter and elapsed time. The
/// host passes its input snapshot to [`step`](Self::step) once per rendered
/// frame and then reads each character's matrices for upload.
pub struct SimulationContext<A: ActionId = Action> {
    characters: SlotMap<CharacterKey, Box<dyn Controller<A>>>,
    frame: u64,
    elapsed: f32,
}

impl<A: ActionId> Default for SimulationContext<A> {
    fn default() -> Self {
        Self {
            characters: SlotMap::with_key(),
            frame: 0,
            elapsed: 0.0,
        }
    }
}

impl<A: ActionId> SimulationContext<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, character: impl Controller<A> + 'static) -> CharacterKey {
        let key = self.characters.insert(Box::new(character));
        log::debug!("Spawned character {key:?}");
        key
    }

    pub fn despawn(&mut self, key: CharacterKey) -> bool {
        self.characters.remove(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: CharacterKey) -> Option<&dyn Controller<A>> {
        self.characters.get(key).map(|c| &**c)
    }

    #[must_use]
    pub fn animator(&self, key: CharacterKey) -> Option<&Animator> {
        self.get(key).map(|c| c.animator())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterKey, &dyn Controller<A>)> {
        self.characters.iter().map(|(key, c)| (key, &**c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds simulated so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances every character by one frame.
    pub fn step(&mut self, dt: f32, input: &InputState<A>) {
        for character in self.characters.values_mut() {
            character.update(dt, input);
        }
        self.frame += 1;
        self.elapsed += dt;
    }
}
