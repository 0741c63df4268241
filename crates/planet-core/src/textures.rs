//! Completion handles for textures the renderer loads asynchronously.
//!
//! The scene hands out a [`TextureHandle`] per requested URL and shows a
//! placeholder until the renderer reports back through
//! [`TextureRegistry::complete`]. Handles carry the scene generation that
//! requested them; completions for an older generation, or after shutdown,
//! are dropped.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::error::TextureError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle {
    pub id: u64,
    pub generation: u64,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TextureStatus {
    /// Placeholder in use while the load is in flight.
    Pending,
    Ready,
    /// Load failed; the placeholder stays.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureOutcome {
    Applied,
    Degraded,
    /// Handle belongs to a disposed generation or the scene is gone.
    Stale,
}

#[derive(Debug)]
pub struct TextureRegistry {
    generation: u64,
    live: bool,
    next_id: u64,
    slots: FnvHashMap<u64, TextureStatus>,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self {
            generation: 0,
            live: true,
            next_id: 1,
            slots: FnvHashMap::default(),
        }
    }
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Forget every slot of the current generation and start `generation`.
    pub fn begin_generation(&mut self, generation: u64) {
        self.generation = generation;
        self.slots.clear();
        self.live = true;
    }

    pub fn request(&mut self, url: &str) -> TextureHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(id, TextureStatus::Pending);
        log::debug!("[texture] request #{} gen={} {}", id, self.generation, url);
        TextureHandle {
            id,
            generation: self.generation,
            url: url.to_string(),
        }
    }

    pub fn complete(
        &mut self,
        handle: &TextureHandle,
        result: Result<(), TextureError>,
    ) -> TextureOutcome {
        if !self.live || handle.generation != self.generation {
            log::debug!(
                "[texture] dropping late completion #{} (gen {} vs {})",
                handle.id,
                handle.generation,
                self.generation
            );
            return TextureOutcome::Stale;
        }
        let Some(slot) = self.slots.get_mut(&handle.id) else {
            return TextureOutcome::Stale;
        };
        match result {
            Ok(()) => {
                *slot = TextureStatus::Ready;
                TextureOutcome::Applied
            }
            Err(e) => {
                log::warn!("[texture] {}; keeping placeholder", e);
                *slot = TextureStatus::Failed;
                TextureOutcome::Degraded
            }
        }
    }

    pub fn status(&self, handle: &TextureHandle) -> Option<TextureStatus> {
        if handle.generation != self.generation {
            return None;
        }
        self.slots.get(&handle.id).copied()
    }

    /// Stop accepting completions, e.g. when the scene is torn down.
    pub fn shutdown(&mut self) {
        self.live = false;
        self.slots.clear();
    }
}
