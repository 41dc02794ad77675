#![doc = include_str!("../README.md")]

pub mod env;
pub mod error;

pub use env::{detect_env_mode, init_logger, EnvMode};
pub use error::{ApiError, Denial, ErrorCode, HttpStatus};
