//! # engine_demo
//!
//! Builds a small scene across all three storage tiers, steps it a few
//! frames, and prints query results as JSON.
//!
//! Set `RUST_LOG=engine_world=debug` to watch tier routing, and
//! `ENGINE_STRICT_ATTRIBUTES` / `ENGINE_RECORD_DESPAWNS` to change world
//! behaviour.

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_component::{
    Builtin, Camera2d, Component, ComponentDecl, Entity, Mesh, ScalarType, Sprite, Text2d, Value,
};
use engine_math::{Color, Transform, Vec3};
use engine_world::{Query, World, WorldConfig};

const FRAMES: usize = 3;
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_demo=info".parse()?))
        .init();

    let config = WorldConfig::from_env();
    info!(?config, "engine demo starting");
    let mut world = World::with_config(config);

    let velocity = ComponentDecl::builder("Velocity")
        .attribute_zeroed("x", ScalarType::Float)
        .attribute_zeroed("y", ScalarType::Float)
        .build()?;
    let player = ComponentDecl::builder("Player").build()?;
    world.register_declaration(&velocity)?;

    world.spawn(vec![Camera2d::default().into()])?;
    let hero = world.spawn(vec![
        Transform::from_xyz(0.0, 0.0, 1.0).into(),
        Sprite::default().into(),
        velocity.instantiate().with("x", 120.0)?.into(),
        player.instantiate().into(),
    ])?;
    let label = world.spawn(vec![
        Transform::from_xyz(0.0, 24.0, 2.0).into(),
        Text2d::new("hero").into(),
    ])?;
    world.set_parent(label, hero)?;

    for (i, x) in [-100.0, 0.0, 100.0].into_iter().enumerate() {
        let mesh = Mesh::regular_polygon(16.0, 3 + i as u32)
            .with_color(Color::rgb(0.2, 0.6, 1.0));
        world.spawn(vec![
            Transform::from_xyz(x, -80.0, 0.0).into(),
            mesh.into(),
            velocity.instantiate().with("y", 30.0 * (i as f64 + 1.0))?.into(),
        ])?;
    }
    info!(aux_entities = world.entity_ids_with_aux_data().len(), "scene built");

    for frame in 0..FRAMES {
        let movers = world.query_entities(
            Query::new()
                .fetch(Builtin::Transform)
                .fetch(&velocity),
        )?;
        for entity in &movers {
            step(&mut world, *entity)?;
        }
        info!(frame, moved = movers.len(), "frame stepped");
    }

    let shapes = world
        .query([Builtin::Transform, Builtin::RegularPolygon])?
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&shapes)?);

    let heroes = world
        .query_with(Query::new().fetch(Builtin::Transform).with(&player))?
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&heroes)?);

    if !world.despawn_recursive(hero) {
        bail!("foreign store failed while despawning {hero}");
    }
    let despawned = world.drain_despawned();
    info!(?despawned, "despawn log drained");

    Ok(())
}

/// Integrate one entity's velocity into its transform.
fn step(world: &mut World, entity: Entity) -> Result<()> {
    let Component::Transform(transform) = world.get_component(entity, Builtin::Transform)? else {
        bail!("{entity} has a malformed transform");
    };
    let Component::Declared(velocity) = world.get_component(entity, "Velocity")? else {
        bail!("{entity} has no declared velocity");
    };
    let axis = |name: &str| -> Result<f32> {
        velocity
            .get(name)
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .with_context(|| format!("velocity of {entity} lacks '{name}'"))
    };
    let delta = Vec3::new(axis("x")?, axis("y")?, 0.0) * FRAME_DT;
    world.insert_component(entity, transform.translated(delta))?;
    Ok(())
}
