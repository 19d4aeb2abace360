mod config;
mod error;
mod project_id;
mod retry;
mod signing;
