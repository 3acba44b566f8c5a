//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Item parsing (functions, externs, interfaces, implementations, enums)
//! - Expression parsing (binary ops, calls, blocks, `if`, `let`, `match`)
//! - Type parsing for type annotations
//!
//! Declarations are registered in the program's declaration table as they
//! are parsed. The parser stops at the first syntax error.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
