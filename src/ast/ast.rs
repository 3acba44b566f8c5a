use std::rc::Rc;

use crate::{lexer::tokens::TokenKind, Span};

use super::types::{FunctionType, Type};

/// A node of the syntax tree.
///
/// `ty` is empty when the parser produces the node and is filled in by the
/// type checker once the node has been visited.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    String(String),
    Number(NumberLiteral),
    Identifier(String),
    BinaryOperation(BinaryOperation),
    UnaryOperation(UnaryOperation),
    Function(Function),
    Block(Vec<Node>),
    Call(Call),
    If(If),
    List(Vec<Node>),
    Match(Match),
    Case(Case),
    Let(Let),
    Assignment(Assignment),
    Constructor(Constructor),
    Pattern(Pattern),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Float(f64),
}

impl NumberLiteral {
    pub fn is_float(&self) -> bool {
        matches!(self, NumberLiteral::Float(_))
    }
}

#[derive(Debug, Clone)]
pub struct BinaryOperation {
    pub operator: TokenKind,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct UnaryOperation {
    pub operator: TokenKind,
    pub operand: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub span: Span,
}

/// A function definition. Its signature lives in the declaration table under
/// `name`; implementation functions are registered under their mangled name.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Box<Node>,
}

/// Static dispatch target of a call to an interface method.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub symbol: String,
    pub target: Rc<FunctionType>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
    pub dispatch: Option<Dispatch>,
}

#[derive(Debug, Clone)]
pub struct If {
    pub condition: Box<Node>,
    pub if_body: Box<Node>,
    pub else_body: Option<Box<Node>>,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub value: Box<Node>,
    pub cases: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub pattern: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Let {
    pub assignments: Vec<Node>,
    pub block: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub left: Box<Node>,
    pub value: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Constructor {
    pub name: String,
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub constructor: String,
    pub bindings: Vec<Parameter>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span, ty: None }
    }

    pub fn get_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::String(_) => "String",
            NodeKind::Number(_) => "Number",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::BinaryOperation(_) => "BinaryOperation",
            NodeKind::UnaryOperation(_) => "UnaryOperation",
            NodeKind::Function(_) => "Function",
            NodeKind::Block(_) => "Block",
            NodeKind::Call(_) => "Call",
            NodeKind::If(_) => "If",
            NodeKind::List(_) => "List",
            NodeKind::Match(_) => "Match",
            NodeKind::Case(_) => "Case",
            NodeKind::Let(_) => "Let",
            NodeKind::Assignment(_) => "Assignment",
            NodeKind::Constructor(_) => "Constructor",
            NodeKind::Pattern(_) => "Pattern",
        }
    }

    /// Short source-like rendering used in diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            NodeKind::String(value) => format!("{:?}", value),
            NodeKind::Number(NumberLiteral::Int(value)) => value.to_string(),
            NodeKind::Number(NumberLiteral::Float(value)) => value.to_string(),
            NodeKind::Identifier(name) => name.clone(),
            NodeKind::Function(function) => function.name.clone(),
            NodeKind::Call(call) => format!("{}(...)", call.callee.describe()),
            NodeKind::Constructor(constructor) => constructor.name.clone(),
            NodeKind::Pattern(pattern) => pattern.constructor.clone(),
            _ => self.kind_name().to_string(),
        }
    }

    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::String(_)
            | NodeKind::Number(_)
            | NodeKind::Identifier(_)
            | NodeKind::Pattern(_) => vec![],
            NodeKind::BinaryOperation(op) => vec![&op.left, &op.right],
            NodeKind::UnaryOperation(op) => vec![&op.operand],
            NodeKind::Function(function) => vec![&function.body],
            NodeKind::Block(nodes) | NodeKind::List(nodes) => nodes.iter().collect(),
            NodeKind::Call(call) => {
                let mut children = vec![call.callee.as_ref()];
                children.extend(call.arguments.iter());
                children
            }
            NodeKind::If(if_node) => {
                let mut children = vec![if_node.condition.as_ref(), if_node.if_body.as_ref()];
                children.extend(if_node.else_body.as_deref());
                children
            }
            NodeKind::Match(match_node) => {
                let mut children = vec![match_node.value.as_ref()];
                children.extend(match_node.cases.iter());
                children
            }
            NodeKind::Case(case) => vec![&case.pattern, &case.body],
            NodeKind::Let(let_node) => {
                let mut children: Vec<&Node> = let_node.assignments.iter().collect();
                children.push(&let_node.block);
                children
            }
            NodeKind::Assignment(assignment) => vec![&assignment.left, &assignment.value],
            NodeKind::Constructor(constructor) => constructor.arguments.iter().collect(),
        }
    }
}

/// Visits `node` and all of its descendants, parents first.
pub fn walk<'a>(node: &'a Node, visit: &mut dyn FnMut(&'a Node)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}
