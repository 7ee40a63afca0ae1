//! Graph rendering

mod dot;

pub use dot::{unocaps, write_dot, DotStyle};
