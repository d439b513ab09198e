//! CSV loading and shared value schemas for arbor.
//!
//! [`NominalReader`] reads a CSV file into a [`TextTable`]; [`Schema`]
//! assigns every value of every column an index so that several tables can
//! be encoded consistently as [`arbor_tree::NominalTable`]s.

mod error;
mod reader;
mod schema;

pub use error::IoError;
pub use reader::{NominalReader, TextTable};
pub use schema::Schema;
