pub mod cities;
pub mod commands;
