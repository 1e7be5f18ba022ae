pub mod config;
pub mod core;
pub mod models;
pub mod presentation;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
