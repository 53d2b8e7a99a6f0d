//! tally-ingest: reading statements and keyword files from disk.

pub mod keywords;
pub mod statement;

pub use keywords::{load_keywords, save_keywords};
pub use statement::{StatementLayout, read_statement};
