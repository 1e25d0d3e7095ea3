//! Contact form: rules, sanitizing, form state, submission and audit trail.

pub mod audit;
pub mod fallback;
pub mod form;
pub mod handlers;
pub mod rules;
pub mod sanitize;
pub mod service;
pub mod session;
pub mod validation;
