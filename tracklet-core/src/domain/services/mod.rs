mod bulk;
mod entry_service;

pub use bulk::*;
pub use entry_service::*;
