//! Token secrets and the normalized token result.

pub mod result;
pub mod secret;
