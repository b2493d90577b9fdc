pub mod provider;
pub mod refresh;
pub mod types;
