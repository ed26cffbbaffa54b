use std::collections::HashSet;

use ultraviolet::Vec3;

use cubz_ecs::{DeltaTime, Entity, Result, System, SystemView, World};

use crate::components::{ChunkData, Mesh, MeshRenderer, Transform, CHUNK_SIZE};

/// Streams chunks around the camera and rebuilds meshes of changed chunks.
///
/// Chunks outside of the view distance are destroyed, missing chunks are spawned.
/// Both happen through the command buffer, so new chunks appear in the next frame.
///
#[derive(Debug)]
pub struct ChunkUpdateSystem {
    view_distance: i32,
    center: (i32, i32),
    rebuilt: usize,
}

impl ChunkUpdateSystem {
    pub fn new(view_distance: i32) -> Self {
        Self {
            view_distance,
            center: (0, 0),
            rebuilt: 0,
        }
    }

    /// Moves center of loaded area to the chunk which contains given position.
    pub fn follow(&mut self, position: Vec3) {
        let x = (position.x / CHUNK_SIZE as f32).floor() as i32;
        let z = (position.z / CHUNK_SIZE as f32).floor() as i32;
        if (x, z) != self.center {
            log::debug!("loaded area moved to chunk {:?}", (x, z));
            self.center = (x, z);
        }
    }

    /// Count of meshes rebuilt since creation.
    pub fn rebuilt(&self) -> usize {
        self.rebuilt
    }

    fn in_range(&self, (x, z): (i32, i32)) -> bool {
        let (cx, cz) = self.center;
        (x - cx).abs() <= self.view_distance && (z - cz).abs() <= self.view_distance
    }

    fn area(&self) -> impl Iterator<Item = (i32, i32)> {
        let (cx, cz) = self.center;
        let distance = self.view_distance;
        (-distance..=distance)
            .flat_map(move |dx| (-distance..=distance).map(move |dz| (cx + dx, cz + dz)))
    }
}

impl System for ChunkUpdateSystem {
    fn update(&mut self, mut view: SystemView<'_>, _: DeltaTime) -> Result<()> {
        let mut loaded = HashSet::new();
        for entity in view.entities() {
            let chunk = *view.get::<ChunkData>(entity)?;
            if !self.in_range(chunk.coord) {
                view.commands().destroy_entity(entity);
                continue;
            }
            loaded.insert(chunk.coord);
            if chunk.dirty {
                view.get_mut::<Mesh>(entity)?.vertices = mesh_vertices(&chunk);
                view.get_mut::<ChunkData>(entity)?.dirty = false;
                self.rebuilt += 1;
            }
        }

        for coord in self.area().filter(|coord| !loaded.contains(coord)) {
            view.commands()
                .spawn(move |world, entity| spawn_chunk(world, entity, coord));
        }
        Ok(())
    }
}

/// Attaches all components of a chunk to the entity.
pub fn spawn_chunk(world: &mut World, entity: Entity, coord: (i32, i32)) -> Result<()> {
    let chunk = ChunkData::new(coord);
    world.add_component(entity, Transform::at(chunk.origin()))?;
    world.add_component(entity, Mesh::default())?;
    world.add_component(
        entity,
        MeshRenderer {
            shader: "block",
            texture: "atlas",
        },
    )?;
    world.add_component(entity, chunk)
}

/// Count of vertices of visible block faces of the chunk.
pub fn mesh_vertices(chunk: &ChunkData) -> u32 {
    const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    let mut faces = 0;
    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let height = chunk.height(x, z);
            faces += 1;
            faces += NEIGHBOURS
                .iter()
                .map(|&(dx, dz)| height.saturating_sub(chunk.height(x + dx, z + dz)))
                .sum::<u32>();
        }
    }
    faces * 6
}
