pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod profiling;
pub mod session;
pub mod srs;
pub mod state;
pub mod trainer;

#[cfg(test)]
pub mod testing;
