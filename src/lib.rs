pub mod config;
pub mod constants;
pub mod engine;
pub mod entity;
pub mod error;
pub mod logging;
pub mod maze;
pub mod physics;
pub mod types;
