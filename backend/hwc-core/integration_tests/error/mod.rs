mod cloud;
mod core_error;
