//! Author list data model

mod record;
mod row_id;
pub mod text;

pub use record::*;
pub use row_id::*;
