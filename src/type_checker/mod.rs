//! Type checking and semantic analysis module.
//!
//! This module infers a type for every node of the AST while:
//!
//! - Instantiating the generics of each call site in a fresh scope
//! - Checking arguments, return types and branch compatibility
//! - Resolving interface method calls to a concrete implementation
//! - Binding the variables introduced by `let` and pattern matching
//!
//! The first failure aborts the pass and is reported by the driver,
//! `type_checker::type_check`, as a single located error.

pub mod builtins;
pub mod compat;
pub mod env;
pub mod simplify;
pub mod type_checker;
