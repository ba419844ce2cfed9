mod common;

use std::sync::Arc;

use common::{config, floor_grid, simulation, spawn};
use geometry::aabb::Aabb;
use glam::{DVec3, IVec3};
use living::{blocks::Solid, grid::BlockGrid, ground::on_ground};

fn humanoid_box(feet: DVec3) -> Aabb {
    Aabb::create(feet, 0.6, 1.8)
}

#[test]
fn standing_on_floor() {
    let grid = floor_grid();
    let bbox = humanoid_box(DVec3::new(0.5, 1.0, 0.5));

    assert!(on_ground(&grid, &bbox));
    // pure: asking again changes nothing
    assert!(on_ground(&grid, &bbox));
}

#[test]
fn hovering_is_not_ground() {
    let grid = floor_grid();
    assert!(!on_ground(&grid, &humanoid_box(DVec3::new(0.5, 1.2, 0.5))));
}

#[test]
fn within_slab_tolerance() {
    let grid = floor_grid();
    assert!(on_ground(&grid, &humanoid_box(DVec3::new(0.5, 1.03, 0.5))));
    assert!(on_ground(&grid, &humanoid_box(DVec3::new(0.5, 1.0 - 1e-9, 0.5))));
}

#[test]
fn touching_a_wall_is_not_ground() {
    let mut grid = BlockGrid::new();
    let stone = Arc::new(Solid::new());
    for y in 0..4 {
        grid.set_block(IVec3::new(1, y, 0), stone.clone());
    }

    // flush against the wall's side face, feet mid-air
    let bbox = Aabb::new((0.4, 1.5, 0.2), (1.0, 3.3, 0.8));
    assert!(!on_ground(&grid, &bbox));
}

#[test]
fn corner_overhang_counts() {
    let mut grid = BlockGrid::new();
    grid.set_block(IVec3::new(0, 0, 0), Arc::new(Solid::new()));

    // only a sliver of the box is above the block
    let bbox = Aabb::new((0.9, 1.0, 0.9), (1.5, 2.8, 1.5));
    assert!(on_ground(&grid, &bbox));
}

#[test]
fn removed_support_means_falling() {
    let (mut sim, _) = simulation(floor_grid());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.0, 0.5));

    sim.tick();
    assert!(sim.get(id).unwrap().on_ground());

    sim.world_mut().remove_block(IVec3::new(0, 0, 0));
    sim.tick();

    let living = sim.get(id).unwrap();
    assert!(!living.on_ground());
    assert!(living.position().y < 1.0);
    assert!(living.fall_distance() > 0.0);
}

#[test]
fn ground_flag_survives_resting() {
    let (mut sim, _) = simulation(floor_grid());
    let id = spawn(&mut sim, config(), DVec3::new(0.5, 1.0, 0.5));

    for _ in 0..40 {
        sim.tick();
        let living = sim.get(id).unwrap();
        assert!(living.on_ground());
        assert!((living.position().y - 1.0).abs() < 1e-9);
    }
    assert!((sim.get(id).unwrap().health() - 20.0).abs() < f64::EPSILON);
}
