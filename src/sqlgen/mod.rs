//! JSON record to SQL statement transformation
//!
//! The pipeline through this module is: filter a record to its table's
//! whitelist and flatten what remains (`normalize`), turn typed values
//! into SQL literal text (`encode`), and fan records out into primary and
//! junction INSERT statements according to their table kind (`expand`).

pub mod encode;
pub mod expand;
pub mod normalize;
pub mod statement;

pub use encode::sql_literal;
pub use expand::{expand, Expansion};
pub use normalize::{normalize, NormalizedRow};
pub use statement::{insert_statement, SqlStatement};
