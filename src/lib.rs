//! Workmode - keep a domain blacklist in the system hosts file and toggle it on and off.

pub mod blacklist;
pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod parse;
pub mod platform;
pub mod workmode;

pub use blacklist::{Blacklist, Outcome, Prefix, Status};
pub use error::{Result, WorkmodeError};
pub use workmode::Workmode;
