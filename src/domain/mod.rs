//! Domain Layer
//!
//! Entities, typed errors, outbound ports and pure services. Nothing in this
//! layer performs I/O.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
