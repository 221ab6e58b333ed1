mod entry_gateway;
mod mock;

pub use entry_gateway::*;
pub use mock::*;
