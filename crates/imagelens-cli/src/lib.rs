// ImageLens CLI Library

pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod router;

pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter, Commands};
