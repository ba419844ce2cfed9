use std::any::Any;

use rustc_hash::FxHashMap;

/// Arbitrary per-entity data attached at runtime by game logic.
///
/// Values live only as long as the entity does in memory. They are never part of
/// [`EntityState`](crate::world::EntityState) and never persisted.
#[derive(Default)]
pub struct Values {
    entries: FxHashMap<String, Box<dyn Any>>,
}

impl std::fmt::Debug for Values {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl Values {
    /// Stores `value` under `key`, returning whatever was there before.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) -> Option<Box<dyn Any>> {
        self.entries.insert(key.into(), Box::new(value))
    }

    /// The value under `key`, if present and of type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)?.downcast_mut()
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Any>> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut values = Values::default();
        assert!(values.set("kills", 3_u32).is_none());

        assert_eq!(values.get::<u32>("kills"), Some(&3));
        assert_eq!(values.get::<i64>("kills"), None);

        *values.get_mut::<u32>("kills").unwrap() += 1;
        assert_eq!(values.get::<u32>("kills"), Some(&4));
    }

    #[test]
    fn replace_and_remove() {
        let mut values = Values::default();
        values.set("owner", String::from("alice"));
        assert!(values.set("owner", String::from("bob")).is_some());
        assert_eq!(values.len(), 1);

        assert!(values.remove("owner").is_some());
        assert!(!values.contains("owner"));
        assert!(values.is_empty());
    }
}
