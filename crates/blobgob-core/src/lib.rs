pub mod config;
pub mod error;
pub mod logging;

pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod input;
pub mod listing;
pub mod pipeline;
pub mod report;
pub mod validate;
