//! Starglyph - in-system flight rendered as a character grid.
//!
//! A library crate providing the flight engine, its renderer and the Bevy
//! plugin that drives them, for the binary and for integration tests.

pub mod camera;
pub mod config;
pub mod docking;
pub mod flight;
pub mod handoff;
pub mod hud;
pub mod input;
pub mod math;
pub mod particles;
pub mod plugin;
pub mod portal;
pub mod render;
pub mod scenarios;
pub mod session;
pub mod ship;
pub mod system;
pub mod time;

#[cfg(test)]
pub mod test_utils;
