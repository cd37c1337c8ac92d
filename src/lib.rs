pub mod candidates;
pub mod column;
pub mod config;
pub mod flexible;
pub mod geometry;
pub mod optimize;
pub mod patterns;
pub mod render;
pub mod solver;
pub mod types;
