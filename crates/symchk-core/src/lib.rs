pub mod config;
pub mod logging;

pub mod batch;
pub mod decompress;
pub mod fetch;
pub mod identity;
pub mod rate_limit;
pub mod reader;
pub mod resolver;
pub mod retrieve;
pub mod retry;
