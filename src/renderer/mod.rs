//! Rendering surface
//!
//! Simulations draw through the `Canvas` trait with `&self` access only, so a
//! render pass can never touch gameplay state. `DrawList` records the calls
//! for headless runs and tests.

pub mod canvas;

pub use canvas::{Canvas, Color, DrawCommand, DrawList, palette};
