pub mod api;
pub mod boundaries;
pub mod error;
pub mod geometry;
pub mod output;
pub mod resolve;
pub mod session;
pub mod timebucket;
