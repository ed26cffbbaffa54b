use ultraviolet::Vec3;

use cubz_ecs::{Entity, Result, System, SystemView};

use crate::components::{DirectionalLight, PointLight};

/// Count of point lights supported by the block shader.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Lights dimmer than this at the camera are not uploaded.
const MIN_INTENSITY: f32 = 1e-3;

/// Chooses lights which affect the scene and uploads them to the shaders.
///
/// Lights are uploaded again only when the set of the nearest lights changes
/// or when some of them were marked as updated.
///
#[derive(Debug)]
pub struct LightRenderSystem {
    sun: DirectionalLight,
    active: Vec<Entity>,
    dirty: bool,
    uploads: usize,
}

impl LightRenderSystem {
    pub fn new(sun: DirectionalLight) -> Self {
        Self {
            sun,
            active: Vec::with_capacity(MAX_POINT_LIGHTS),
            dirty: true,
            uploads: 0,
        }
    }

    pub fn sun(&self) -> &DirectionalLight {
        &self.sun
    }

    /// Point lights uploaded by the last pass, nearest first.
    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    /// Count of uploads since creation.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn upload(&mut self, mut view: SystemView<'_>, camera_position: Vec3) -> Result<&[Entity]> {
        let mut nearest = Vec::new();
        for entity in view.entities() {
            let light = view.get::<PointLight>(entity)?;
            let distance = (light.position - camera_position).mag();
            if light.enabled && light.attenuation(distance) >= MIN_INTENSITY {
                nearest.push((distance, entity));
            }
        }
        nearest.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        nearest.truncate(MAX_POINT_LIGHTS);
        let nearest: Vec<_> = nearest.into_iter().map(|(_, entity)| entity).collect();

        let changed = view.take_updated().iter().any(|entity| nearest.contains(&entity));
        if self.dirty || changed || nearest != self.active {
            log::trace!("uploading {} point lights", nearest.len());
            self.active = nearest;
            self.dirty = false;
            self.uploads += 1;
        }
        Ok(&self.active)
    }
}

impl System for LightRenderSystem {
    fn on_entity_added(&mut self, _: Entity) {
        self.dirty = true;
    }

    fn on_entity_removed(&mut self, _: Entity) {
        self.dirty = true;
    }
}
