//! Components of the game world.
//!
//! All of them are plain values: rendering resources are referenced by name
//! and resolved by the renderer.

use palette::Srgb;
use ultraviolet::projection::perspective_vk as perspective;
use ultraviolet::{Mat4, Vec3, Vec4};

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: 1.0,
        }
    }

    /// Model matrix of this transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }
}

/// Geometry uploaded to the GPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mesh {
    pub vertices: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRenderer {
    pub shader: &'static str,
    pub texture: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Srgb,
    pub diffuse: Srgb,
    pub specular: Srgb,
    pub enabled: bool,
}

impl PointLight {
    /// Light intensity at given distance from the light.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Light without position, such as the sun.
///
/// Not a component: owned by the light system.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Srgb,
    pub diffuse: Srgb,
    pub specular: Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyboxRenderer {
    pub cube_map: &'static str,
    pub shader: &'static str,
}

/// Column of blocks at chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkData {
    pub coord: (i32, i32),
    /// Mesh of the chunk must be rebuilt.
    pub dirty: bool,
}

impl ChunkData {
    pub fn new(coord: (i32, i32)) -> Self {
        Self { coord, dirty: true }
    }

    /// World position of the chunk origin.
    pub fn origin(&self) -> Vec3 {
        let (x, z) = self.coord;
        Vec3::new((x * CHUNK_SIZE) as f32, 0.0, (z * CHUNK_SIZE) as f32)
    }

    /// Height of the terrain column at local block coordinates.
    pub fn height(&self, x: i32, z: i32) -> u32 {
        let (cx, cz) = self.coord;
        let wx = cx * CHUNK_SIZE + x;
        let wz = cz * CHUNK_SIZE + z;
        (wx.rem_euclid(7) + wz.rem_euclid(5)) as u32 + 1
    }
}

/// Viewer of the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            target: Vec3::zero(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, Vec3::unit_y())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        perspective(70f32.to_radians(), aspect, 0.1, 500.0)
    }

    /// Returns `true` if the point is in front of the camera.
    pub fn faces(&self, view_projection: Mat4, point: Vec3) -> bool {
        let clip = view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
        clip.w > 0.0
    }
}
