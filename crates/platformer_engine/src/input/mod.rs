//! Keyboard state with one-frame edge detection
//!
//! [`InputState`] keeps the keys held this frame and a snapshot of the
//! previous frame. Events update the current set as they arrive;
//! [`InputState::post_update`] copies current into previous once per frame,
//! after gameplay has read the edges.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keyboard double buffer
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: HashSet<KeyCode>,
    previous: HashSet<KeyCode>,
}

impl InputState {
    /// Create an input state with no keys held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release for the current frame
    pub fn handle_event(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.current.insert(key);
        } else {
            self.current.remove(&key);
        }
    }

    /// Snapshot the current frame into the previous-frame buffer
    pub fn post_update(&mut self) {
        self.previous.clone_from(&self.current);
    }

    /// Whether `key` is held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.current.contains(&key)
    }

    /// Whether `key` went from released to held since the last
    /// [`post_update`](Self::post_update)
    pub fn was_just_pressed(&self, key: KeyCode) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }

    /// Whether `key` went from held to released since the last
    /// [`post_update`](Self::post_update)
    pub fn was_just_released(&self, key: KeyCode) -> bool {
        !self.current.contains(&key) && self.previous.contains(&key)
    }

    /// `positive - negative` as -1, 0 or 1
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        f32::from(u8::from(self.is_pressed(positive))) - f32::from(u8::from(self.is_pressed(negative)))
    }

    /// Release every key in both buffers
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_lasts_one_frame() {
        let mut input = InputState::new();

        input.handle_event(KeyCode::Space, true);
        assert!(input.is_pressed(KeyCode::Space));
        assert!(input.was_just_pressed(KeyCode::Space));
        input.post_update();

        // Still held on the next frame, edge gone
        assert!(input.is_pressed(KeyCode::Space));
        assert!(!input.was_just_pressed(KeyCode::Space));
        input.post_update();

        input.handle_event(KeyCode::Space, false);
        assert!(input.was_just_released(KeyCode::Space));
        input.post_update();

        input.handle_event(KeyCode::Space, true);
        assert!(input.was_just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_press_and_release_within_one_frame_has_no_edge() {
        let mut input = InputState::new();
        input.handle_event(KeyCode::Up, true);
        input.handle_event(KeyCode::Up, false);

        assert!(!input.is_pressed(KeyCode::Up));
        assert!(!input.was_just_pressed(KeyCode::Up));
    }

    #[test]
    fn test_repeat_press_events_do_not_retrigger() {
        let mut input = InputState::new();
        input.handle_event(KeyCode::Up, true);
        input.post_update();
        input.handle_event(KeyCode::Up, true);

        assert!(!input.was_just_pressed(KeyCode::Up));
    }

    #[test]
    fn test_axis() {
        let mut input = InputState::new();
        assert_eq!(input.axis(KeyCode::Left, KeyCode::Right), 0.0);

        input.handle_event(KeyCode::Right, true);
        assert_eq!(input.axis(KeyCode::Left, KeyCode::Right), 1.0);

        input.handle_event(KeyCode::Left, true);
        assert_eq!(input.axis(KeyCode::Left, KeyCode::Right), 0.0);

        input.handle_event(KeyCode::Right, false);
        assert_eq!(input.axis(KeyCode::Left, KeyCode::Right), -1.0);
    }
}
