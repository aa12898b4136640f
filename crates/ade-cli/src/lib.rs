//! CLI library components for the ADE generator.

pub mod logging;
pub mod status;
