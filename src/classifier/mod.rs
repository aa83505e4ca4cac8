pub mod config;
pub mod rules;

pub use config::ClassifierConfig;
pub use rules::classify;
