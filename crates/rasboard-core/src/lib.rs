// Core library for the RAS vs Pro Bowl dashboard: player records, table
// operations, color scales, and data loading.

pub mod color;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod predictions;
pub mod record;
pub mod table;
