pub mod catalog;
pub mod config;
pub mod contact;
pub mod debounce;
pub mod email_client;
pub mod errors;
pub mod routes;
pub mod state;
