pub mod event;
pub mod log_entry;
pub mod meta;
