//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: enrollment submission against the remote API
//! - Terminal events: key presses and the periodic tick

pub mod network;
pub mod terminal;
