//! REST backend adapter: client wrapper, envelope normalization, port impls.

pub mod backend;
pub mod client;
pub mod normalize;

pub use backend::BackendApi;
pub use client::RestClient;
