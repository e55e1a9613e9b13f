use std::sync::Arc;

use puppet_animation::AnimationClip;
use rustc_hash::FxHashMap;

/// Named clips available to a character.
///
/// A name may be registered without a clip: the loader tried and failed.
/// Lookups of such names return `None`, the same as unknown names, and any
/// transition that needs them is skipped.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: FxHashMap<String, Option<Arc<AnimationClip>>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loaded clip under its own name.
    pub fn add(&mut self, clip: Arc<AnimationClip>) {
        self.clips.insert(clip.name.clone(), Some(clip));
    }

    /// Registers `name`, loaded or not.
    pub fn insert(&mut self, name: impl Into<String>, clip: Option<Arc<AnimationClip>>) {
        self.clips.insert(name.into(), clip);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, clip: Option<Arc<AnimationClip>>) -> Self {
        self.insert(name, clip);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name)?.clone()
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.clips.get(name).is_some_and(Option::is_some)
    }

    /// Names registered without a clip.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.clips
            .iter()
            .filter(|(_, clip)| clip.is_none())
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
