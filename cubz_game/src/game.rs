//! Scene setup and per-frame logic of the game.

use palette::Srgb;
use ultraviolet::Vec3;

use cubz_ecs::{Config as EcsConfig, DeltaTime, Entity, Result, World};

use crate::components::{
    Camera, ChunkData, DirectionalLight, Mesh, MeshRenderer, PointLight, SkyboxRenderer, Transform,
};
use crate::config::Config;
use crate::systems::{
    ChunkUpdateSystem, LightRenderSystem, MeshRenderSystem, RenderStats, SkyboxRenderSystem,
};

/// Speed of the camera flying over the terrain, in blocks per second.
const CAMERA_SPEED: f32 = 8.0;

/// Aspect ratio of the virtual window.
const ASPECT: f32 = 800.0 / 600.0;

pub struct Game {
    world: World,
    camera: Camera,
    test_light: Entity,
}

impl Game {
    /// Registers all components and systems and fills the initial scene.
    pub fn new(config: &Config) -> Result<Self> {
        let mut world = World::with_config(EcsConfig::new(config.max_entities()));

        world.register_component::<Transform>()?;
        world.register_component::<MeshRenderer>()?;
        world.register_component::<PointLight>()?;
        world.register_component::<Mesh>()?;
        world.register_component::<SkyboxRenderer>()?;
        world.register_component::<ChunkData>()?;

        world.register_system(ChunkUpdateSystem::new(config.view_distance()))?;
        let signature = world.signature_of::<(ChunkData, Mesh, Transform)>()?;
        world.set_system_signature::<ChunkUpdateSystem>(signature)?;

        world.register_system(MeshRenderSystem::new(ASPECT))?;
        let signature = world.signature_of::<(Transform, MeshRenderer, Mesh)>()?;
        world.set_system_signature::<MeshRenderSystem>(signature)?;

        world.register_system(SkyboxRenderSystem::new())?;
        let signature = world.signature_of::<(SkyboxRenderer,)>()?;
        world.set_system_signature::<SkyboxRenderSystem>(signature)?;

        let sun = DirectionalLight {
            direction: Vec3::new(1.0, -1.0, 1.0),
            ambient: Srgb::new(0.2, 0.2, 0.2),
            diffuse: Srgb::new(1.0, 1.0, 1.0),
            specular: Srgb::new(1.0, 1.0, 1.0),
        };
        world.register_system(LightRenderSystem::new(sun))?;
        let signature = world.signature_of::<(PointLight,)>()?;
        world.set_system_signature::<LightRenderSystem>(signature)?;

        let skybox = world.create_entity()?;
        world.add_component(
            skybox,
            SkyboxRenderer {
                cube_map: "skybox",
                shader: "skybox",
            },
        )?;

        let mut camera = Camera::new(Vec3::new(4.0, 1.0, 3.0) * 10.0);
        camera.look_at(Vec3::zero());

        let test_light = world.create_entity()?;
        world.add_component(
            test_light,
            PointLight {
                position: Vec3::zero(),
                constant: 1.0,
                linear: 0.7,
                quadratic: 1.8,
                ambient: Srgb::new(0.1, 0.1, 0.1),
                diffuse: Srgb::new(5.0, 1.0, 1.0),
                specular: Srgb::new(5.0, 1.0, 1.0),
                enabled: true,
            },
        )?;
        world.update_entity(test_light)?;

        log::info!(
            "{} v{} started with {} entities",
            config.name(),
            config.version(),
            world.entity_count(),
        );
        Ok(Self {
            world,
            camera,
            test_light,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Simulates one frame.
    ///
    /// Systems draw the state left by the previous frame,
    /// then chunks are streamed and all deferred changes are applied.
    ///
    pub fn frame(&mut self, delta_time: DeltaTime) -> Result<RenderStats> {
        let camera = self.camera;
        let world = &mut self.world;

        world.run_system::<LightRenderSystem, _, _>(|system, view| {
            system.upload(view, camera.position()).map(|lights| lights.len())
        })??;
        let stats = world
            .run_system::<MeshRenderSystem, _, _>(|system, view| system.render(view, &camera))??;
        world.run_system::<SkyboxRenderSystem, _, _>(|system, view| system.render(view, &camera))??;

        self.fly(delta_time)?;
        self.world.update(delta_time)?;
        Ok(stats)
    }

    /// Moves the camera forward together with the test light.
    fn fly(&mut self, delta_time: DeltaTime) -> Result<()> {
        let step = Vec3::new(CAMERA_SPEED * delta_time.as_secs_f32(), 0.0, 0.0);
        let position = self.camera.position() + step;
        self.camera.set_position(position);
        self.camera.look_at(position + Vec3::new(1.0, -0.5, 0.0));

        self.world.get_component_mut::<PointLight>(self.test_light)?.position = position;
        self.world.update_entity(self.test_light)?;
        self.world
            .system_mut::<ChunkUpdateSystem>()?
            .follow(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames() {
        let config = Config::default();
        let mut game = Game::new(&config).unwrap();
        assert_eq!(game.world().entity_count(), 2);

        let side = (2 * config.view_distance() + 1) as usize;
        let chunks = side * side;
        let frame = DeltaTime::from_millis(16);

        // Chunks are spawned at the end of the first frame
        // and get their meshes at the end of the second one.
        let stats = game.frame(frame).unwrap();
        assert_eq!(stats.draw_calls + stats.culled, 0);
        assert_eq!(game.world().entity_count(), 2 + chunks);
        let stats = game.frame(frame).unwrap();
        assert_eq!(stats.draw_calls + stats.culled, 0);
        let stats = game.frame(frame).unwrap();
        assert_eq!(stats.draw_calls + stats.culled, chunks);

        let lights = game.world().system::<LightRenderSystem>().unwrap();
        assert_eq!(lights.active(), &[game.test_light]);
        assert_eq!(lights.uploads(), 3);
        assert!(game.camera().position().x > 40.0);
    }
}
