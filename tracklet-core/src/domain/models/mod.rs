mod bulk;
mod ids;
mod time_entry;

pub use bulk::*;
pub use ids::*;
pub use time_entry::*;
