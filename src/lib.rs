//! Herald library — re-exports modules for integration tests.

pub mod build;
pub mod channel;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod jenkins;
pub mod poller;
pub mod render;
pub mod tracker;
