mod config;
mod retry;
mod signing;
