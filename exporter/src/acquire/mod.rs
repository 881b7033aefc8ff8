pub mod args;
pub mod repeaterbook;
