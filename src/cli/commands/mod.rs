pub mod analyze;
pub mod config;
pub mod coverage;
pub mod improve;
