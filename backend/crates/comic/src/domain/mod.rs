//! Domain Layer
//!
//! Panel and image types, prompt building and the generator traits.

pub mod entities;
pub mod gateway;
pub mod services;
pub mod value_objects;
