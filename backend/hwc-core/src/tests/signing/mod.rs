mod canonical;
mod key;
