//! GLFW window event source
//!
//! Opens a window with no client API (rendering is done elsewhere) and
//! translates its key and close events.

use super::{Platform, PlatformError, PlatformEvent};
use crate::core::WindowConfig;
use crate::input::KeyCode;

/// GLFW window wrapper
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwPlatform {
    /// Open a window from configuration
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| PlatformError::InitializationFailed(e.to_string()))?;

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(PlatformError::WindowCreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);

        log::info!("Opened {}x{} window '{}'", config.width, config.height, config.title);
        Ok(Self { glfw, window, events })
    }

    /// Window size in screen coordinates
    pub fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width.unsigned_abs(), height.unsigned_abs())
    }
}

impl Platform for GlfwPlatform {
    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.glfw.poll_events();

        let mut events = Vec::new();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::Close => events.push(PlatformEvent::Quit),
                glfw::WindowEvent::Key(key, _, action, _) => {
                    let Some(key) = map_key(key) else { continue };
                    match action {
                        glfw::Action::Press => events.push(PlatformEvent::Key { key, pressed: true }),
                        glfw::Action::Release => events.push(PlatformEvent::Key { key, pressed: false }),
                        glfw::Action::Repeat => {}
                    }
                }
                _ => {}
            }
        }

        if self.window.should_close() && !events.contains(&PlatformEvent::Quit) {
            events.push(PlatformEvent::Quit);
        }
        events
    }
}

fn map_key(key: glfw::Key) -> Option<KeyCode> {
    use glfw::Key;

    Some(match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(glfw::Key::Space), Some(KeyCode::Space));
        assert_eq!(map_key(glfw::Key::Left), Some(KeyCode::Left));
        assert_eq!(map_key(glfw::Key::F5), None);
    }
}
