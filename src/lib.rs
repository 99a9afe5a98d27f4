pub mod auth;
pub mod collector;
pub mod commands;
pub mod config;
pub mod error;
pub mod google;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod sheets;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;
