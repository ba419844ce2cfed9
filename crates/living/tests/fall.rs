mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use common::{config, floor_grid, simulation, spawn};
use glam::{DVec3, IVec3};
use living::{
    blocks::{HayBale, Slab, Water},
    fall::fall_damage,
    grid::BlockGrid,
};

fn settle(sim: &mut living::Simulation<BlockGrid>, id: living::EntityId, max_ticks: usize) {
    for _ in 0..max_ticks {
        sim.tick();
        if sim.get(id).is_none_or(living::Living::on_ground) {
            return;
        }
    }
}

#[test]
fn landing_converts_distance_to_damage() {
    let (mut sim, _) = simulation(floor_grid());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.05, 0.5));
    sim.get_mut(id).unwrap().set_fall_distance(5.5);

    sim.tick();

    let living = sim.get(id).unwrap();
    assert!(living.on_ground());
    assert_relative_eq!(living.fall_distance(), 0.0);
    assert_relative_eq!(living.health(), 17.0);
}

#[test]
fn short_fall_is_harmless() {
    let (mut sim, _) = simulation(floor_grid());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.05, 0.5));
    sim.get_mut(id).unwrap().set_fall_distance(3.2);

    sim.tick();

    assert_relative_eq!(sim.get(id).unwrap().health(), 20.0);
}

#[test]
fn real_drop_hurts_on_impact() {
    let (mut sim, _) = simulation(floor_grid());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 12.0, 0.5));

    let mut deepest = 0.0_f64;
    for _ in 0..200 {
        sim.tick();
        let living = sim.get(id).unwrap();
        deepest = deepest.max(living.fall_distance());
        if living.on_ground() {
            break;
        }
    }

    let living = sim.get(id).unwrap();
    assert!(living.on_ground());
    assert_relative_eq!(living.position().y, 1.0, epsilon = 1e-6);
    assert_relative_eq!(living.fall_distance(), 0.0);
    assert_relative_eq!(living.velocity().y, 0.0, epsilon = 1e-6);

    let expected = fall_damage(deepest).unwrap();
    assert_relative_eq!(living.health(), 20.0 - expected);
}

#[test]
fn hay_bale_cushions() {
    let mut grid = BlockGrid::new();
    grid.set_block(IVec3::ZERO, Arc::new(HayBale));
    let (mut sim, _) = simulation(grid);
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.05, 0.5));
    sim.get_mut(id).unwrap().set_fall_distance(10.0);

    sim.tick();

    let living = sim.get(id).unwrap();
    assert!(living.on_ground());
    assert_relative_eq!(living.health(), 20.0);
}

#[test]
fn slab_is_found_under_feet() {
    let mut grid = BlockGrid::new();
    grid.set_block(IVec3::ZERO, Arc::new(Slab));
    let (mut sim, _) = simulation(grid);
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 3.0, 0.5));

    settle(&mut sim, id, 100);

    let living = sim.get(id).unwrap();
    assert!(living.on_ground());
    assert_relative_eq!(living.position().y, 0.5, epsilon = 1e-6);
}

#[test]
fn water_breaks_the_fall() {
    let mut grid = floor_grid();
    grid.set_block(IVec3::new(0, 1, 0), Arc::new(Water));
    let (mut sim, _) = simulation(grid);
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.05, 0.5));
    sim.get_mut(id).unwrap().set_fall_distance(20.0);

    sim.tick();

    let living = sim.get(id).unwrap();
    assert!(living.on_ground());
    assert_relative_eq!(living.health(), 20.0);
}

#[test]
fn climbing_eats_into_fall_distance() {
    let (mut sim, _) = simulation(BlockGrid::new());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 50.0, 0.5));

    sim.update(id, |living, tx| {
        living.move_by(tx, DVec3::new(0.0, -2.0, 0.0), 0.0, 0.0);
        living.move_by(tx, DVec3::new(0.0, 0.5, 0.0), 0.0, 0.0);
    });
    assert_relative_eq!(sim.get(id).unwrap().fall_distance(), 1.5);

    sim.update(id, |living, tx| living.move_by(tx, DVec3::new(0.0, 2.0, 0.0), 0.0, 0.0));
    assert_relative_eq!(sim.get(id).unwrap().fall_distance(), 0.0);
}
