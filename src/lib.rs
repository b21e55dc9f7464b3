pub mod config;
pub mod error;
pub mod parse;
pub mod query;
pub mod registry;
pub mod validate;
pub mod wasm;
