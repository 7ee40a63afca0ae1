//! Table relationship graph

mod infer;
mod links;

pub use infer::{infer_links, source_links, JoinGraph};
pub use links::{Link, TableRef};
