//! Configuration: environment settings plus shared constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, MediaConfig};
