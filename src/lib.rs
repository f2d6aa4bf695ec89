#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else, clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod api;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod feedback;
pub mod form;
mod maud_conveniences;
pub mod route;

pub use editor::{Collaborators, EditorCommand, EditorController, EditorSnapshot};
pub use error::{EditorError, EditorResult};
