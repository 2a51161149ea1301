// Utsushi Signed Media URL Library

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod proxy;
pub mod security;
pub mod server;
pub mod signing;
