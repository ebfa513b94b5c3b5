pub mod context;
pub mod error;
pub mod utils;

pub use context::*;
