//! Service Layer
//!
//! Business logic lives here, keeping handlers thin and response types as
//! pure DTOs.

mod agent_service;

pub use agent_service::*;
