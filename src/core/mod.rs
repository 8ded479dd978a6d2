// roitab - core/mod.rs
//
// Core transform layer: label decomposition, record reading, table
// building, CSV serialisation.
// Dependencies: no filesystem access; content in, table out.

pub mod export;
pub mod label;
pub mod model;
pub mod reader;
pub mod table;
