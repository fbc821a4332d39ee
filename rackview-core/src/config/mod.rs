//! Configuration types

pub mod settings;

pub use settings::*;
