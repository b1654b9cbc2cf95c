pub mod cli;
pub mod error;
pub mod github;
pub mod server;
pub mod session;
pub mod types;
pub mod viewer;
