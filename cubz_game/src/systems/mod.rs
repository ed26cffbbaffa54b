//! Systems of the game.

pub use chunk::ChunkUpdateSystem;
pub use light::LightRenderSystem;
pub use mesh::{MeshRenderSystem, RenderStats};
pub use skybox::SkyboxRenderSystem;

mod chunk;
mod light;
mod mesh;
mod skybox;
mod tests;
