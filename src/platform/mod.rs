// spotvault - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate, key crypto crates.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
pub mod keys;
pub mod wallpaper;
