//! One-shot audio request queue
//!
//! Requests are entities holding an [`AudioPlayer`]. Draining plays each
//! request once and destroys its entity whether or not playback succeeded,
//! so the queue is empty at the end of every frame.

use crate::audio::AudioSystem;
use crate::ecs::{AudioPlayer, Entity, World};

/// Spawn a request to play `player`'s source at the end of this frame
pub fn request_audio(world: &mut World, player: AudioPlayer) -> Entity {
    let entity = world.spawn();
    world.insert(entity, player);
    entity
}

/// Play and destroy every pending request, returning how many played
pub fn drain_audio_requests(world: &mut World, audio: &mut AudioSystem) -> usize {
    let mut requests = Vec::new();
    world
        .query::<&AudioPlayer>()
        .for_each(|entity, player| requests.push((entity, *player)));

    let mut played = 0;
    for (entity, AudioPlayer(source)) in requests {
        match audio.play(source) {
            Ok(()) => played += 1,
            Err(err) => log::error!("Audio request {entity:?} failed: {err}"),
        }
        world.despawn(entity);
    }
    played
}
