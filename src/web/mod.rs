//! Web API module for the rota application.

pub mod ask;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod status;
pub mod transcribe;

pub use routes::*;
