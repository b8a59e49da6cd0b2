//! Domain model structs.
//!
//! Each submodule contains the entity struct returned by the store plus,
//! where the column types differ from the domain types, a `FromRow` row
//! struct and its conversion.

pub mod battery_history;
pub mod drone;
pub mod medication;
