//! Headless renderer
//!
//! Decodes textures with `image` to learn their size, then records each
//! frame's draw list instead of submitting it to a GPU. Used by tests and
//! by builds without a window backend.

use std::path::{Path, PathBuf};

use slotmap::SlotMap;

use super::{RenderError, Renderer, SpriteFrame, TextureId};
use crate::ecs::Entity;
use crate::foundation::math::Mat4;

#[derive(Debug, Clone)]
struct TextureInfo {
    source: Option<PathBuf>,
    width: u32,
    height: u32,
}

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity the sprite came from
    pub entity: Entity,
    /// Texture drawn
    pub texture: TextureId,
    /// Camera times model matrix
    pub transform: Mat4,
    /// Draw order key
    pub z_index: i32,
    /// Horizontal mirror
    pub flip_x: bool,
    /// Vertical mirror
    pub flip_y: bool,
}

/// Renderer that records draw lists
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    textures: SlotMap<TextureId, TextureInfo>,
    initialized: bool,
    last_frame: Vec<DrawCommand>,
    frames_rendered: u64,
}

impl HeadlessRenderer {
    /// Create an uninitialized renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-memory texture of the given size
    pub fn create_texture(&mut self, width: u32, height: u32) -> TextureId {
        self.textures.insert(TextureInfo {
            source: None,
            width,
            height,
        })
    }

    /// Draws recorded by the last [`Renderer::render`], back to front
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of frames rendered
    pub const fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// File a texture was loaded from, if any
    pub fn texture_source(&self, texture: TextureId) -> Option<&Path> {
        self.textures.get(texture)?.source.as_deref()
    }
}

impl Renderer for HeadlessRenderer {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn initialize(&mut self) -> Result<(), RenderError> {
        self.initialized = true;
        log::info!("Headless renderer initialized");
        Ok(())
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, RenderError> {
        let image = image::open(path).map_err(|e| RenderError::TextureLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let (width, height) = (image.width(), image.height());
        log::debug!("Loaded texture {width}x{height} from {}", path.display());

        Ok(self.textures.insert(TextureInfo {
            source: Some(path.to_path_buf()),
            width,
            height,
        }))
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(texture).map(|info| (info.width, info.height))
    }

    fn render(&mut self, frame: &SpriteFrame) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }

        let mut draws = Vec::with_capacity(frame.sprites.len());
        for instance in &frame.sprites {
            let texture = instance.sprite.texture;
            if !self.textures.contains_key(texture) {
                log::error!("Skipping sprite of {:?}: {}", instance.entity, RenderError::UnknownTexture(texture));
                continue;
            }

            draws.push(DrawCommand {
                entity: instance.entity,
                texture,
                transform: frame.camera * instance.model_matrix(),
                z_index: instance.sprite.z_index,
                flip_x: instance.sprite.flip_x,
                flip_y: instance.sprite.flip_y,
            });
        }

        draws.sort_by_key(|draw| draw.z_index);
        self.last_frame = draws;
        self.frames_rendered += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Sprite, Transform, World};
    use crate::foundation::math::Vec2;
    use crate::render::Camera2D;

    #[test]
    fn test_render_before_initialize_fails() {
        let mut renderer = HeadlessRenderer::new();
        let frame = SpriteFrame::collect(&World::new(), &Camera2D::new(640.0, 368.0));

        assert!(matches!(renderer.render(&frame), Err(RenderError::NotInitialized)));
    }

    #[test]
    fn test_draws_sorted_by_z_index() {
        let mut renderer = HeadlessRenderer::new();
        renderer.initialize().unwrap();
        let texture = renderer.create_texture(16, 16);

        let mut world = World::new();
        let front = world.spawn();
        world.insert(front, Transform::default());
        world.insert(front, Sprite::new(texture, Vec2::new(16.0, 16.0)).with_z_index(2));
        let back = world.spawn();
        world.insert(back, Transform::default());
        world.insert(back, Sprite::new(texture, Vec2::new(640.0, 360.0)).with_z_index(-1));

        renderer
            .render(&SpriteFrame::collect(&world, &Camera2D::new(640.0, 368.0)))
            .unwrap();

        let order: Vec<Entity> = renderer.last_frame().iter().map(|draw| draw.entity).collect();
        assert_eq!(order, vec![back, front]);
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn test_unknown_texture_is_skipped() {
        let mut renderer = HeadlessRenderer::new();
        renderer.initialize().unwrap();

        let mut world = World::new();
        let entity = world.spawn();
        world.insert(entity, Transform::default());
        world.insert(entity, Sprite::new(TextureId::default(), Vec2::new(1.0, 1.0)));

        renderer
            .render(&SpriteFrame::collect(&world, &Camera2D::new(640.0, 368.0)))
            .unwrap();
        assert!(renderer.last_frame().is_empty());
    }

    #[test]
    fn test_load_texture_reads_png_size() {
        let path = std::env::temp_dir().join(format!("platformer-texture-{}.png", std::process::id()));
        image::RgbaImage::new(19, 19).save(&path).unwrap();

        let mut renderer = HeadlessRenderer::new();
        let texture = renderer.load_texture(&path).unwrap();
        assert_eq!(renderer.texture_size(texture), Some((19, 19)));
        assert_eq!(renderer.texture_source(texture), Some(path.as_path()));

        std::fs::remove_file(&path).ok();
        assert!(matches!(
            renderer.load_texture(&path),
            Err(RenderError::TextureLoad { .. })
        ));
    }
}
