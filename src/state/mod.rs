//! Application state management module.
//!
//! This module contains the core state of the front end, including:
//! - Main `State` struct that owns the wizard and everything drawn around it
//! - Navigation types (View, Focusable)
//! - Modal dialogs

mod dialog;
mod navigation;

pub use dialog::Dialog;
pub use navigation::{Focusable, View};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
