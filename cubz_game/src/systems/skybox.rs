use cubz_ecs::{Result, System, SystemView};

use crate::components::{Camera, SkyboxRenderer};

/// Draws skyboxes around the camera.
#[derive(Debug, Default)]
pub struct SkyboxRenderSystem {
    drawn: usize,
}

impl SkyboxRenderSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of skyboxes drawn since creation.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn render(&mut self, view: SystemView<'_>, camera: &Camera) -> Result<usize> {
        let mut count = 0;
        for entity in view.entities() {
            let skybox = view.get::<SkyboxRenderer>(entity)?;
            log::trace!(
                "drawing `{}` with `{}` around {:?}",
                skybox.cube_map,
                skybox.shader,
                camera.position(),
            );
            count += 1;
        }
        self.drawn += count;
        Ok(count)
    }
}

impl System for SkyboxRenderSystem {}
