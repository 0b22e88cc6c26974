//! Light the pads of a MIDI controller with the notes of a scale.
//!
//! Input events and the one-shot device connection result flow through a
//! single channel into [`app::App`], which owns all mutable state.

pub mod app;
pub mod color;
pub mod config;
pub mod device;
pub mod illumination;
pub mod input;
pub mod scale;
pub mod ui;
