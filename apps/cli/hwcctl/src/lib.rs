// Library exports for testing
// The binary (main.rs) imports these as well

pub mod app;
pub mod args;
pub mod error;
pub mod logger;
pub mod summary;

#[cfg(test)]
mod tests;

/// Set to `1` to log at debug level.
pub const DEBUG_ENV: &str = "HWCCTL_DEBUG";
