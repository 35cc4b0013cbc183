//! API Request and Response Types
//!
//! Wire types for the REST surface. They serialize in camelCase.

mod agent;
mod mapping;

pub use agent::*;
