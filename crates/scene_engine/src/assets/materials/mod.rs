//! Material library parsing for external models

pub mod mtl_parser;

pub use mtl_parser::{MtlParser, MtlData, MtlError};
