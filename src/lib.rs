//! Seamless looping marquees and pointer-follower effects, driven by an
//! injectable frame ticker.

pub mod app;
pub mod config;
pub mod features;
pub mod gfx;
mod registry;
pub mod term;
pub mod ticker;
pub mod track;
pub mod viewport;
