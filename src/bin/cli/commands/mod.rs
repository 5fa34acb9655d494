pub mod ingest;
pub mod item;
pub mod list;
pub mod study;
