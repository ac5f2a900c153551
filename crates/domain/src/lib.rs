//! Domain layer for the weather collector
//!
//! Contains the weather record entity, the city table and the value objects
//! they are built from. This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
