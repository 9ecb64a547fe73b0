//! Shelf command-line front end

pub mod cmd;
pub mod logging;
pub mod terminal;
