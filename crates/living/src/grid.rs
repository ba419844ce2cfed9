//! A sparse, in-memory [`World`].

use std::sync::Arc;

use glam::{DVec3, IVec3};
use rustc_hash::FxHashMap;

use crate::{
    blocks::Air,
    world::{Block, Viewer, World},
};

static AIR: Air = Air;

/// Blocks keyed by position. Every unset position is air.
pub struct BlockGrid {
    blocks: FxHashMap<IVec3, Arc<dyn Block>>,
    liquids: FxHashMap<IVec3, Arc<dyn Block>>,
    raining: bool,
    floor: i32,
    viewers: Vec<Arc<dyn Viewer>>,
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGrid {
    /// An empty grid whose void starts at y = -64.
    #[must_use]
    pub fn new() -> Self {
        Self::with_floor(-64)
    }

    #[must_use]
    pub fn with_floor(floor: i32) -> Self {
        Self {
            blocks: FxHashMap::default(),
            liquids: FxHashMap::default(),
            raining: false,
            floor,
            viewers: Vec::new(),
        }
    }

    pub fn set_block(&mut self, pos: IVec3, block: Arc<dyn Block>) {
        self.blocks.insert(pos, block);
    }

    pub fn remove_block(&mut self, pos: IVec3) -> Option<Arc<dyn Block>> {
        self.blocks.remove(&pos)
    }

    /// Fills every position from `min` to `max` inclusive with `block`.
    pub fn fill(&mut self, min: IVec3, max: IVec3, block: &Arc<dyn Block>) {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                for z in min.z..=max.z {
                    self.blocks.insert(IVec3::new(x, y, z), Arc::clone(block));
                }
            }
        }
    }

    /// Layers a liquid over whatever block occupies `pos`.
    pub fn set_liquid(&mut self, pos: IVec3, liquid: Arc<dyn Block>) {
        self.liquids.insert(pos, liquid);
    }

    pub fn remove_liquid(&mut self, pos: IVec3) -> Option<Arc<dyn Block>> {
        self.liquids.remove(&pos)
    }

    pub const fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    pub fn add_viewer(&mut self, viewer: Arc<dyn Viewer>) {
        self.viewers.push(viewer);
    }
}

impl World for BlockGrid {
    fn block(&self, pos: IVec3) -> &dyn Block {
        match self.blocks.get(&pos) {
            Some(block) => &**block,
            None => &AIR,
        }
    }

    fn liquid(&self, pos: IVec3) -> Option<&dyn Block> {
        self.liquids.get(&pos).map(|liquid| &**liquid)
    }

    fn raining_at(&self, _pos: IVec3) -> bool {
        self.raining
    }

    fn floor(&self) -> i32 {
        self.floor
    }

    fn viewers(&self, _position: DVec3) -> Vec<&dyn Viewer> {
        self.viewers.iter().map(|viewer| &**viewer).collect()
    }
}
