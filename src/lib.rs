pub mod cache;
pub mod client;
pub mod config;
pub mod dates;
pub mod errors;
pub mod games;
pub mod gateway;
pub mod models;
pub mod nav;
pub mod poller;
pub mod session;
pub mod state;
pub mod storage;

pub use client::ApiClient;
pub use errors::ApiError;
pub use state::{AppState, BootOutcome};
pub use storage::LocalStore;
