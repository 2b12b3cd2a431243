pub mod config;

pub use config::BanyanConfig;
