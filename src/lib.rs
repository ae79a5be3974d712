pub mod builder;
pub mod capability;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod logging;
pub mod manifest;
pub mod mixfile;
pub mod resolver;
pub mod session;
pub mod task;
pub mod util;
pub mod watch;

pub use builder::Mix;
pub use error::{MixError, Result};
pub use session::{Finalized, Session};
