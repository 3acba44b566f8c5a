//! Error types and error handling for the type checker.
//!
//! This module defines the error types used throughout the front end and the
//! type checker. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and type checking
//! - Error names and suggestion tips used when rendering reports
//! - The fatal error returned by the type-checking driver

pub mod errors;

#[cfg(test)]
mod tests;
