mod in_memory_reading_store;
mod reading;
mod reading_log;
mod repository;
mod result;

pub use in_memory_reading_store::*;
pub use reading::*;
pub use reading_log::*;
pub use repository::*;
pub use result::*;
