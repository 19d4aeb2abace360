mod effective;
mod resolver;
