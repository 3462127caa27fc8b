//! Linux `/proc` source.

pub mod parser;
mod source;

pub use source::ProcfsSource;
