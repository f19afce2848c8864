// ABOUTME: Root module for realnex - CRM bulk fetching, record mutation, phone validation.
// ABOUTME: Re-exports the error types; see prelude for the common imports.

pub mod config;
pub mod crm;
pub mod error;
pub mod prelude;
pub mod validator;

pub use error::Error;
