pub mod bounds;
pub mod config;
pub mod geo;
pub mod listing;
pub mod viewport;
