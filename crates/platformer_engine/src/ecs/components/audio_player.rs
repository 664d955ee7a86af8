//! One-shot audio request component
//!
//! Gameplay spawns an entity holding only an [`AudioPlayer`]; the trigger
//! queue plays it and despawns the entity in the same frame.

use crate::audio::AudioSourceId;
use crate::ecs::Component;

/// Request to play a loaded audio source once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPlayer(pub AudioSourceId);

impl Component for AudioPlayer {}
