mod iam;
mod resolver;
