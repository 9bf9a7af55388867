//! Identifiers, scope sets, client info, and the normalized token model.

pub mod client_info;
pub mod id;
pub mod scope;
pub mod token;

pub use client_info::*;
pub use id::*;
pub use scope::*;
pub use token::{result::*, secret::*};
