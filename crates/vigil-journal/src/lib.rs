mod config;
mod conversions;
mod models;
mod reading_repository;

pub use config::JournalConfig;
pub use models::ReadingRecord;
pub use reading_repository::JournalReadingRepository;
