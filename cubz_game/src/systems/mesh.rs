use ultraviolet::Vec3;

use cubz_ecs::{DeltaTime, Result, System, SystemView};

use crate::components::{Camera, Mesh, Transform};

/// Counters of one rendering pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub vertices: u64,
    pub culled: usize,
}

/// Draws every entity with a transform, a mesh and a mesh renderer.
#[derive(Debug)]
pub struct MeshRenderSystem {
    aspect: f32,
    elapsed: DeltaTime,
    last: RenderStats,
}

impl MeshRenderSystem {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            elapsed: DeltaTime::ZERO,
            last: RenderStats::default(),
        }
    }

    /// Statistics of the last [`render`](Self::render) call.
    pub fn last(&self) -> RenderStats {
        self.last
    }

    /// Time accumulated by updates of the system.
    pub fn elapsed(&self) -> DeltaTime {
        self.elapsed
    }

    pub fn render(&mut self, view: SystemView<'_>, camera: &Camera) -> Result<RenderStats> {
        let view_projection = camera.projection(self.aspect) * camera.view();
        let mut stats = RenderStats::default();
        for entity in view.entities() {
            let mesh = view.get::<Mesh>(entity)?;
            if mesh.vertices == 0 {
                continue;
            }
            let transform = view.get::<Transform>(entity)?;
            let model_view_projection = view_projection * transform.matrix();
            if !camera.faces(model_view_projection, Vec3::zero()) {
                stats.culled += 1;
                continue;
            }
            stats.draw_calls += 1;
            stats.vertices += u64::from(mesh.vertices);
        }
        self.last = stats;
        Ok(stats)
    }
}

impl System for MeshRenderSystem {
    fn update(&mut self, _: SystemView<'_>, delta_time: DeltaTime) -> Result<()> {
        self.elapsed += delta_time;
        Ok(())
    }
}
