//! GLOOMWALK: a tile-based first-person raycasting engine
//!
//! A level is a small image: every pixel is a cell, alpha says whether it is
//! a wall, and specially colored marker pixels place the player, enemies,
//! pickups and doors to other levels. The engine renders it one ray per
//! screen column, with sprites composited against the wall depth, and runs
//! a fixed-tick simulation of everything in it.

pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod rasterizer;
pub mod storage;
pub mod telemetry;
pub mod world;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
