// Crate root library declaration and module exports.
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod geo;
pub mod linkcheck;
pub mod model;
pub mod pipeline;
pub mod proximity;
pub mod sheets;
pub mod source;
pub mod store;
pub mod temporal;
pub mod xref;

pub use pipeline::{Data, fetch_data};
