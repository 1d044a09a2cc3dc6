//! fontsieve CLI library.

pub mod cli;
pub mod host;
pub mod subset;
