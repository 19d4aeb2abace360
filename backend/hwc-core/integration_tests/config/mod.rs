mod env;
mod load;
mod profile;
