//! Author list grid editing library
//!
//! Keeps an editable table of authors and their affiliations in sync: one
//! checkbox column per distinct affiliation, a semicolon text box per row,
//! a cut buffer, pagination and autocomplete. The state lives in memory and
//! is handed to a [`submit::SubmitSink`] when the user saves.

pub mod config;
pub mod error;
pub mod focus;
pub mod grid;
pub mod model;
pub mod paging;
pub mod session;
pub mod submit;
pub mod suggest;

pub use config::GridConfig;
pub use grid::Grid;
pub use session::Session;
