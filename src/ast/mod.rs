/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Nodes, node kinds and tree traversal
/// - types: The type algebra shared by the parser and the type checker
pub mod ast;
pub mod types;
