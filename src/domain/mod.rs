//! Domain types and the rules incoming records must satisfy.

pub mod record;
pub mod validate;

pub use record::{NewPotato, Potato, PotatoPatch};
pub use validate::{validate_create, validate_partial, FieldTag};
