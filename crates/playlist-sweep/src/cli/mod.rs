//! CLI subcommand implementations for the playlist-sweep binary.

pub mod doctor;
pub mod output;
pub mod scrape_cmd;
