//! Inputs consumed by broker flows: authority, request parameters, interactive options, and
//! the service/environment context used for capability negotiation.

pub mod authority;
pub mod context;
pub mod interactive;
pub mod parameters;

pub use authority::*;
pub use context::*;
pub use interactive::*;
pub use parameters::*;
