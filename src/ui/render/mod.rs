mod all;
mod change_request;
mod dialog;
mod footer;
mod form;
mod header;
mod log;
mod main;
mod welcome;

use self::log::log;
use super::*;
use footer::footer;
use header::header;
use main::main;

pub use all::all as render;
