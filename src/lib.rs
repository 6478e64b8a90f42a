pub mod cli;
pub mod kredo;
