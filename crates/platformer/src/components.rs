//! Game-specific components

use platformer_engine::ecs::Component;

/// Marks the entity the keyboard controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Player;

impl Component for Player {}

/// Marks a collectible coin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coin;

impl Component for Coin {}
