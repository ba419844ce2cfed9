//! Axis-aligned bounding box math used for entity-versus-block collision.

pub mod aabb;
