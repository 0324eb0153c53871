//! Terminal pre-enrollment wizard for school admissions.
//!
//! The [`wizard`] module holds the engine: field masks and validators, the
//! step forms, the store shared between steps and the final submission.
//! [`api`] talks to the enrollment backend. Everything else is the terminal
//! front end built around them.

pub mod api;
pub mod app;
pub mod config;
pub mod contact;
pub mod error;
pub mod events;
pub mod logger;
pub mod state;
pub mod ui;
pub mod wizard;
