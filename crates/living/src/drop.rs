//! Items an entity leaves behind when it dies.

use std::sync::Arc;

use derive_more::{Display, From};
use glam::DVec3;

/// An item type, identified by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, From)]
pub struct Item(Arc<str>);

impl Item {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Item {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item: Item,
    pub count: u32,
    /// Vanishing stacks disappear instead of dropping when their holder dies.
    pub vanishing: bool,
}

impl ItemStack {
    #[must_use]
    pub fn new(item: impl Into<Item>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            vanishing: false,
        }
    }

    #[must_use]
    pub const fn vanishing(mut self) -> Self {
        self.vanishing = true;
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Clone, Debug)]
enum Count {
    Fixed(u32),
    /// Drawn from `min..max` each time the drop is materialised.
    Random { min: u32, max: u32 },
}

/// A drop rule. The final stack is only decided at death.
#[derive(Clone, Debug)]
pub struct Drop {
    item: Item,
    vanishing: bool,
    count: Count,
}

impl Drop {
    /// Drops between `min` (inclusive) and `max` (exclusive) of `item`. When `min >= max` exactly
    /// `min` items drop.
    #[must_use]
    pub fn new(item: impl Into<Item>, min: u32, max: u32) -> Self {
        Self {
            item: item.into(),
            vanishing: false,
            count: Count::Random { min, max },
        }
    }

    /// Always drops exactly `stack`.
    #[must_use]
    pub fn with_stack(stack: ItemStack) -> Self {
        Self {
            item: stack.item,
            vanishing: stack.vanishing,
            count: Count::Fixed(stack.count),
        }
    }

    /// Rolls the count. Returns `None` when nothing should be spawned.
    #[must_use]
    pub fn stack(&self) -> Option<ItemStack> {
        let count = match self.count {
            Count::Fixed(count) => count,
            Count::Random { min, max } if min >= max => min,
            Count::Random { min, max } => fastrand::u32(min..max),
        };

        let stack = ItemStack {
            item: self.item.clone(),
            count,
            vanishing: self.vanishing,
        };

        (!stack.is_empty() && !stack.vanishing).then_some(stack)
    }
}

/// An item lying in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemEntity {
    pub stack: ItemStack,
    pub position: DVec3,
}
