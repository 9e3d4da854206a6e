#[allow(non_snake_case)]
pub mod Puzzle;
pub mod cli;
pub mod session;
pub mod settings;
