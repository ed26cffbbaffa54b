#![cfg(test)]

use palette::Srgb;
use ultraviolet::Vec3;

use cubz_ecs::{DeltaTime, Entity, World};

use super::chunk::mesh_vertices;
use super::light::MAX_POINT_LIGHTS;
use super::*;
use crate::components::{ChunkData, Mesh, MeshRenderer, PointLight, Transform, CHUNK_SIZE};

const FRAME: DeltaTime = DeltaTime::from_millis(16);

fn chunk_world(view_distance: i32) -> World {
    let mut world = World::new();
    world.register_component::<Transform>().unwrap();
    world.register_component::<Mesh>().unwrap();
    world.register_component::<MeshRenderer>().unwrap();
    world.register_component::<ChunkData>().unwrap();
    world
        .register_system(ChunkUpdateSystem::new(view_distance))
        .unwrap();
    let signature = world
        .signature_of::<(ChunkData, Mesh, Transform)>()
        .unwrap();
    world
        .set_system_signature::<ChunkUpdateSystem>(signature)
        .unwrap();
    world
}

fn coords(world: &World) -> Vec<(i32, i32)> {
    let mut coords: Vec<_> = world
        .system_entities::<ChunkUpdateSystem>()
        .unwrap()
        .iter()
        .map(|entity| world.get_component::<ChunkData>(entity).unwrap().coord)
        .collect();
    coords.sort_unstable();
    coords
}

#[test]
fn test_mesh_vertices() {
    let chunk = ChunkData::new((3, -2));
    let vertices = mesh_vertices(&chunk);
    assert!(vertices >= (CHUNK_SIZE * CHUNK_SIZE * 6) as u32);
    assert_eq!(vertices % 6, 0);
    assert_eq!(vertices, mesh_vertices(&ChunkData::new((3, -2))));
}

#[test]
fn test_chunk_streaming() {
    let mut world = chunk_world(1);

    // Chunks are spawned by commands, so they appear after the update.
    world.update(FRAME).unwrap();
    assert_eq!(world.entity_count(), 9);
    assert_eq!(coords(&world).first(), Some(&(-1, -1)));
    assert_eq!(coords(&world).last(), Some(&(1, 1)));
    for entity in world.system_entities::<ChunkUpdateSystem>().unwrap() {
        assert!(world.get_component::<ChunkData>(entity).unwrap().dirty);
        assert_eq!(world.get_component::<Mesh>(entity).unwrap().vertices, 0);
    }

    world.update(FRAME).unwrap();
    assert_eq!(world.entity_count(), 9);
    assert_eq!(world.system::<ChunkUpdateSystem>().unwrap().rebuilt(), 9);
    for entity in world.system_entities::<ChunkUpdateSystem>().unwrap() {
        assert!(!world.get_component::<ChunkData>(entity).unwrap().dirty);
        assert!(world.get_component::<Mesh>(entity).unwrap().vertices > 0);
    }

    world
        .system_mut::<ChunkUpdateSystem>()
        .unwrap()
        .follow(Vec3::new(3.5 * CHUNK_SIZE as f32, 0.0, 0.0));
    world.update(FRAME).unwrap();
    assert_eq!(world.entity_count(), 9);
    assert_eq!(coords(&world).first(), Some(&(2, -1)));
    assert_eq!(coords(&world).last(), Some(&(4, 1)));
}

#[test]
fn test_chunk_partial_move() {
    let mut world = chunk_world(1);
    world.update(FRAME).unwrap();
    let before: Vec<Entity> = world
        .system_entities::<ChunkUpdateSystem>()
        .unwrap()
        .iter()
        .collect();

    world
        .system_mut::<ChunkUpdateSystem>()
        .unwrap()
        .follow(Vec3::new(CHUNK_SIZE as f32 + 1.0, 0.0, 0.0));
    world.update(FRAME).unwrap();

    // One column of chunks is replaced, the others survive.
    assert_eq!(world.entity_count(), 9);
    let survived = before.iter().filter(|&&entity| world.is_alive(entity)).count();
    assert_eq!(survived, 6);
    assert_eq!(coords(&world).first(), Some(&(0, -1)));
    assert_eq!(coords(&world).last(), Some(&(2, 1)));
}

fn light_world() -> World {
    let mut world = World::new();
    world.register_component::<PointLight>().unwrap();
    let sun = crate::components::DirectionalLight {
        direction: Vec3::new(0.0, -1.0, 0.0),
        ambient: Srgb::new(0.2, 0.2, 0.2),
        diffuse: Srgb::new(1.0, 1.0, 1.0),
        specular: Srgb::new(1.0, 1.0, 1.0),
    };
    world.register_system(LightRenderSystem::new(sun)).unwrap();
    let signature = world.signature_of::<(PointLight,)>().unwrap();
    world
        .set_system_signature::<LightRenderSystem>(signature)
        .unwrap();
    world
}

fn spawn_light(world: &mut World, x: f32, enabled: bool) -> Entity {
    let entity = world.create_entity().unwrap();
    let light = PointLight {
        position: Vec3::new(x, 0.0, 0.0),
        constant: 1.0,
        linear: 0.7,
        quadratic: 1.8,
        ambient: Srgb::new(0.1, 0.1, 0.1),
        diffuse: Srgb::new(1.0, 1.0, 1.0),
        specular: Srgb::new(1.0, 1.0, 1.0),
        enabled,
    };
    world.add_component(entity, light).unwrap();
    entity
}

fn upload(world: &mut World) -> Vec<Entity> {
    world
        .run_system::<LightRenderSystem, _, _>(|system, view| {
            system.upload(view, Vec3::zero()).map(<[Entity]>::to_vec)
        })
        .unwrap()
        .unwrap()
}

fn uploads(world: &World) -> usize {
    world.system::<LightRenderSystem>().unwrap().uploads()
}

#[test]
fn test_nearest_lights() {
    let mut world = light_world();
    let lights: Vec<_> = (1..=6)
        .map(|x| spawn_light(&mut world, x as f32, true))
        .collect();
    spawn_light(&mut world, 0.5, false);

    assert_eq!(upload(&mut world), lights[..MAX_POINT_LIGHTS].to_vec());
    assert_eq!(uploads(&world), 1);

    // Nothing changed since the last upload.
    upload(&mut world);
    assert_eq!(uploads(&world), 1);

    // Updated light which is not active does not cause an upload.
    world.update_entity(lights[5]).unwrap();
    upload(&mut world);
    assert_eq!(uploads(&world), 1);

    world.update_entity(lights[0]).unwrap();
    upload(&mut world);
    assert_eq!(uploads(&world), 2);

    world.destroy_entity(lights[1]).unwrap();
    let active = upload(&mut world);
    assert_eq!(uploads(&world), 3);
    assert_eq!(active, vec![lights[0], lights[2], lights[3], lights[4]]);
}

#[test]
fn test_render_skips_empty_meshes() {
    let mut world = World::new();
    world.register_component::<Transform>().unwrap();
    world.register_component::<Mesh>().unwrap();
    world.register_component::<MeshRenderer>().unwrap();
    world
        .register_system(MeshRenderSystem::new(4.0 / 3.0))
        .unwrap();
    let signature = world
        .signature_of::<(Transform, MeshRenderer, Mesh)>()
        .unwrap();
    world
        .set_system_signature::<MeshRenderSystem>(signature)
        .unwrap();

    let renderer = MeshRenderer {
        shader: "block",
        texture: "atlas",
    };
    for vertices in [0, 36, 24] {
        let entity = world.create_entity().unwrap();
        world
            .add_component(entity, Transform::at(Vec3::zero()))
            .unwrap();
        world.add_component(entity, Mesh { vertices }).unwrap();
        world.add_component(entity, renderer).unwrap();
    }
    // Not tracked: has no renderer.
    let hidden = world.create_entity().unwrap();
    world
        .add_component(hidden, Transform::at(Vec3::zero()))
        .unwrap();
    world.add_component(hidden, Mesh { vertices: 6 }).unwrap();

    let camera = crate::components::Camera::new(Vec3::new(0.0, 0.0, 10.0));
    let stats = world
        .run_system::<MeshRenderSystem, _, _>(|system, view| system.render(view, &camera))
        .unwrap()
        .unwrap();
    assert_eq!(stats.draw_calls + stats.culled, 2);
    assert_eq!(world.system::<MeshRenderSystem>().unwrap().last(), stats);

    world.update(FRAME).unwrap();
    world.update(FRAME).unwrap();
    assert_eq!(world.system::<MeshRenderSystem>().unwrap().elapsed(), FRAME * 2);
}
