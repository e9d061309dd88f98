//! Error types

mod submit;
mod suggest;
mod warning;

pub use submit::*;
pub use suggest::*;
pub use warning::*;
