//! Broker-backed request orchestration and response validation.

pub mod broker_interactive;
pub mod validation;

pub use broker_interactive::*;
pub use validation::*;
