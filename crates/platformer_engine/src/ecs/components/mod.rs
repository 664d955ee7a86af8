//! ECS Components module
//!
//! Engine-level components shared by every game built on the runtime

pub mod transform;
pub mod sprite;
pub mod collider;
pub mod audio_player;

pub use transform::Transform;
pub use sprite::Sprite;
pub use collider::{BodyKind, Collider, ColliderShape};
pub use audio_player::AudioPlayer;
