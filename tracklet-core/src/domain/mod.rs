mod error;

pub mod duration;
pub mod models;
pub mod ports;
pub mod services;
pub mod ticker;
pub mod transitions;

pub use error::*;
