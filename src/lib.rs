pub mod error;
pub mod geometry;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{Result, TopolisError};
