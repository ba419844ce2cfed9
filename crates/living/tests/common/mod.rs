#![allow(dead_code)]

use std::sync::Arc;

use geometry::aabb::Aabb;
use glam::{DVec3, IVec3};
use living::{
    Config, EntityId, EntityType, Simulation,
    blocks::Solid,
    grid::BlockGrid,
    movement::Rotation,
    world::{Block, EntityAction, EntityState, Sound, Viewer},
};
use parking_lot::Mutex;

pub fn init_tracing() {
    drop(
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init(),
    );
}

/// Player sized: 0.6 wide and 1.8 tall.
pub struct Humanoid;

impl EntityType for Humanoid {
    fn encode_entity(&self) -> &str {
        "test:humanoid"
    }

    fn bbox(&self) -> Aabb {
        Aabb::new((-0.3, 0.0, -0.3), (0.3, 1.8, 0.3))
    }
}

pub fn config() -> Config {
    Config::new(Arc::new(Humanoid))
}

/// A 16x16 stone floor whose top face is at y = 1.
pub fn floor_grid() -> BlockGrid {
    let mut grid = BlockGrid::new();
    let stone: Arc<dyn Block> = Arc::new(Solid::new());
    grid.fill(IVec3::new(-8, 0, -8), IVec3::new(8, 0, 8), &stone);
    grid
}

/// A simulation over `grid` with a recording viewer attached.
pub fn simulation(mut grid: BlockGrid) -> (Simulation<BlockGrid>, Arc<Recorder>) {
    init_tracing();
    let recorder = Arc::new(Recorder::default());
    grid.add_viewer(recorder.clone());
    (Simulation::new(grid), recorder)
}

pub fn spawn(sim: &mut Simulation<BlockGrid>, config: Config, position: DVec3) -> EntityId {
    sim.spawn(config, position).unwrap()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Movement { id: EntityId, position: DVec3, on_ground: bool },
    Velocity { id: EntityId, velocity: DVec3 },
    State { id: EntityId, state: EntityState },
    Action { id: EntityId, action: EntityAction },
    Sound { sound: Sound },
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn actions(&self) -> Vec<EntityAction> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Action { action, .. } => Some(*action),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<Sound> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Sound { sound } => Some(*sound),
                _ => None,
            })
            .collect()
    }

    pub fn last_state(&self) -> Option<EntityState> {
        self.events.lock().iter().rev().find_map(|event| match event {
            Event::State { state, .. } => Some(state.clone()),
            _ => None,
        })
    }
}

impl Viewer for Recorder {
    fn view_movement(&self, id: EntityId, position: DVec3, _rotation: Rotation, on_ground: bool) {
        self.events.lock().push(Event::Movement {
            id,
            position,
            on_ground,
        });
    }

    fn view_velocity(&self, id: EntityId, velocity: DVec3) {
        self.events.lock().push(Event::Velocity { id, velocity });
    }

    fn view_state(&self, id: EntityId, state: &EntityState) {
        self.events.lock().push(Event::State {
            id,
            state: state.clone(),
        });
    }

    fn view_action(&self, id: EntityId, action: EntityAction) {
        self.events.lock().push(Event::Action { id, action });
    }

    fn view_sound(&self, _position: DVec3, sound: Sound) {
        self.events.lock().push(Event::Sound { sound });
    }
}
