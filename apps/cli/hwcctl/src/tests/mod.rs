mod args;
mod error;
mod logger;
mod summary;
