pub mod completion;
pub mod constants;
pub mod health;
pub mod history;
pub mod ingress;
pub mod logging;
pub mod main_helper;
pub mod mock;
pub mod prompt;
pub mod sanitize;
pub mod server;
pub mod specs;
pub mod str_utils;
pub mod streaming;
pub mod types;

pub use types::*;

pub use main_helper::{AppState, Args};
