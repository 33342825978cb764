//! Domain layer for RouteLens
//!
//! Contains the transit schema records, value objects, payload validation,
//! the shared text normalizer and domain errors.
//! This layer does no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod normalize;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use normalize::{normalize_direction, normalize_stop_name};
pub use value_objects::*;
