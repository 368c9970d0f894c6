//! wholesale-admin: terminal admin console for a wholesale e-commerce
//! backend, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
