//! Configuration, parameter resolution and the data model shared by both functions

pub mod config;
pub mod models;
pub mod params;
