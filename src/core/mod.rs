pub mod backup;
pub mod clock;
pub mod log;
pub mod roster;
pub mod setup;
pub mod structure;
pub mod tracker;
