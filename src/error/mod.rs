/// Centralized error handling for mixr
pub mod mix;

pub use mix::{MixError, Result};
