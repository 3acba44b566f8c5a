use std::rc::Rc;

use tracing::{debug, error};

use crate::{
    ast::{
        ast::{
            Assignment, BinaryOperation, Call, Case, Constructor, Dispatch, Function, If, Let,
            Match, Node, NodeKind, Pattern, UnaryOperation,
        },
        types::{ConstructorType, FunctionType, Type},
    },
    errors::errors::{Error, ErrorImpl, FatalError, OperandSide},
    render_error, Position, Span,
};

use super::{
    builtins::Builtins,
    compat::{accepts, is_assignable, unify},
    env::Env,
    simplify::simplify_type,
};

#[derive(Debug, Clone, Copy)]
pub struct CheckerOptions {
    /// Deepest AST nesting the checker will descend into.
    pub max_depth: usize,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions { max_depth: 4096 }
    }
}

#[derive(Debug)]
pub struct TypeChecker {
    pub options: CheckerOptions,
    pub builtins: Builtins,
    depth: usize,
    fresh: usize,
}

impl TypeChecker {
    pub fn new(env: &Env, options: CheckerOptions) -> Result<Self, Error> {
        Ok(TypeChecker {
            options,
            builtins: Builtins::from_env(env)?,
            depth: 0,
            fresh: 0,
        })
    }

    fn enter(&mut self, span: &Span) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            self.depth -= 1;
            return Err(Error::new(
                ErrorImpl::RecursionLimit {
                    limit: self.options.max_depth,
                },
                span.start.clone(),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// A placeholder for `name` that no other instantiation shares.
    ///
    /// Displays as `name`.
    pub fn fresh_generic(&mut self, name: &str) -> Type {
        self.fresh += 1;
        Type::Generic(format!("{}#{}", name, self.fresh))
    }

    /// Rebinds every generic of `generics` still unbound in `scope` to a fresh
    /// placeholder, so types leaving `scope` never mention the declared names.
    fn close_generics(&mut self, generics: &[String], scope: &Env) {
        for generic in generics {
            if simplify_type(&Type::Generic(generic.clone()), scope).is_generic_named(generic) {
                let fresh = self.fresh_generic(generic);
                scope.set(generic, fresh);
            }
        }
    }
}

/// What an enclosing node hands down to a child besides the environment.
#[derive(Clone, Copy)]
enum Context<'a> {
    Plain,
    /// The scope a `let` opened, reused by its trailing block.
    Scope(&'a Env),
    /// The type of the value a `match` inspects.
    Subject(&'a Type),
}

/// Infers the type of `node` in `env` and records it on the node.
pub fn type_of(tc: &mut TypeChecker, node: &mut Node, env: &Env) -> Result<Type, Error> {
    type_of_with(tc, node, env, Context::Plain)
}

fn type_of_with(
    tc: &mut TypeChecker,
    node: &mut Node,
    env: &Env,
    context: Context,
) -> Result<Type, Error> {
    tc.enter(&node.span)?;
    // Deep nesting grows the stack on the heap instead of overflowing
    let result = stacker::maybe_grow(32 * 1024, 2 * 1024 * 1024, || infer(tc, node, env, context));
    tc.leave();

    let ty = result?;
    node.ty = Some(ty.clone());
    Ok(ty)
}

fn infer(tc: &mut TypeChecker, node: &mut Node, env: &Env, context: Context) -> Result<Type, Error> {
    let span = node.span.clone();

    match &mut node.kind {
        NodeKind::String(_) => Ok(tc.builtins.string.clone()),
        NodeKind::Number(number) => Ok(if number.is_float() {
            tc.builtins.float.clone()
        } else {
            tc.builtins.int.clone()
        }),
        NodeKind::Identifier(name) => env.get(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownTypeError {
                    expression: name.clone(),
                },
                span.start.clone(),
            )
        }),
        NodeKind::BinaryOperation(operation) => type_of_binary(tc, operation, env),
        NodeKind::UnaryOperation(operation) => type_of_unary(tc, operation, env),
        NodeKind::Function(function) => type_of_function(tc, function, env),
        NodeKind::Block(nodes) => {
            // Statements share one scope so a binding stays visible to later siblings
            let scope = match context {
                Context::Scope(scope) => scope.clone(),
                _ => env.child(),
            };
            type_of_block(tc, nodes, &scope)
        }
        NodeKind::Call(call) => type_of_call(tc, call, env, &span),
        NodeKind::If(if_node) => type_of_if(tc, if_node, env, &span),
        NodeKind::List(items) => type_of_list(tc, items, env),
        NodeKind::Match(match_node) => type_of_match(tc, match_node, env, &span),
        NodeKind::Case(case) => {
            let subject = match context {
                Context::Subject(subject) => Some(subject),
                _ => None,
            };
            type_of_case(tc, case, env, subject)
        }
        NodeKind::Let(let_node) => type_of_let(tc, let_node, env),
        NodeKind::Assignment(assignment) => type_of_assignment(tc, assignment, env),
        NodeKind::Constructor(constructor) => type_of_constructor(tc, constructor, env, &span),
        NodeKind::Pattern(pattern) => {
            let constructor = lookup_pattern_constructor(pattern, env, &span)?;
            Ok(owning_type(&constructor.signature))
        }
    }
}

fn type_of_binary(
    tc: &mut TypeChecker,
    operation: &mut BinaryOperation,
    env: &Env,
) -> Result<Type, Error> {
    for (side, node) in [
        (OperandSide::Left, &mut operation.left),
        (OperandSide::Right, &mut operation.right),
    ] {
        let ty = simplify_type(&type_of(tc, node, env)?, env);

        if !is_assignable(&tc.builtins.int, &ty, env) {
            return Err(Error::new(
                ErrorImpl::OperandTypeError {
                    side,
                    found: ty.to_string(),
                },
                node.span.start.clone(),
            ));
        }
    }

    Ok(tc.builtins.int.clone())
}

fn type_of_unary(
    tc: &mut TypeChecker,
    operation: &mut UnaryOperation,
    env: &Env,
) -> Result<Type, Error> {
    type_of(tc, &mut operation.operand, env)?;
    Ok(tc.builtins.int.clone())
}

/// Binds the callee's own generics as unbound placeholders and, for an
/// interface method, the interface parameter to the interface itself.
fn install_generics(function: &FunctionType, scope: &Env) {
    for generic in &function.generics {
        scope.set(generic, Type::Generic(generic.clone()));
    }

    if let Some(interface) = function.interface() {
        debug!(interface = %interface.name, function = %function.name, "installing interface parameter");
        let generic = interface.generic.clone();
        scope.set(&generic, Type::Interface(interface));
    }
}

fn type_of_function(tc: &mut TypeChecker, function: &mut Function, env: &Env) -> Result<Type, Error> {
    let signature = env
        .get(&function.name)
        .and_then(|ty| ty.as_function().cloned())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::MissingSignature {
                    function: function.name.clone(),
                },
                function.body.span.start.clone(),
            )
        })?;

    if signature.params.len() != function.params.len() {
        return Err(Error::new(
            ErrorImpl::ArityError {
                function: function.name.clone(),
                expected: signature.params.len(),
                received: function.params.len(),
            },
            function.body.span.start.clone(),
        ));
    }

    let scope = env.child();
    install_generics(&signature, &scope);
    for (param, ty) in function.params.iter().zip(signature.params.iter()) {
        scope.set(&param.name, ty.clone());
    }

    let body = type_of(tc, &mut function.body, &scope)?;
    let expected = simplify_type(&signature.return_type, &scope);
    let actual = simplify_type(&body, &scope);

    if !accepts(&expected, &actual, &scope) {
        return Err(Error::new(
            ErrorImpl::ReturnTypeMismatch {
                expected: expected.to_string(),
                received: actual.to_string(),
            },
            function.body.span.start.clone(),
        ));
    }

    Ok(Type::function(FunctionType {
        return_type: actual,
        ..(*signature).clone()
    }))
}

fn type_of_block(tc: &mut TypeChecker, nodes: &mut [Node], scope: &Env) -> Result<Type, Error> {
    let mut last = tc.builtins.void.clone();
    for node in nodes.iter_mut() {
        last = type_of(tc, node, scope)?;
    }
    Ok(last)
}

/// Checks `arguments` against `function` and computes the resolved return
/// type.
///
/// The generic bindings of this call live in a fresh child of `env`, which is
/// returned alongside the type so dispatch can inspect them.
pub fn type_check_arguments(
    tc: &mut TypeChecker,
    arguments: &mut [Node],
    function: &FunctionType,
    env: &Env,
    location: &Position,
) -> Result<(Type, Env), Error> {
    if arguments.len() != function.params.len() {
        return Err(Error::new(
            ErrorImpl::ArityError {
                function: function.name.clone(),
                expected: function.params.len(),
                received: arguments.len(),
            },
            location.clone(),
        ));
    }

    let scope = env.child();
    install_generics(function, &scope);

    for (index, (argument, param)) in arguments.iter_mut().zip(function.params.iter()).enumerate() {
        let expected = simplify_type(param, &scope);
        let actual = simplify_type(&type_of(tc, argument, env)?, env);

        if accepts(&expected, &actual, &scope) {
            continue;
        }

        let error = match &expected {
            Type::Interface(interface) => ErrorImpl::MissingImplementation {
                interface: interface.name.clone(),
                type_: actual.to_string(),
            },
            _ => ErrorImpl::ArgumentTypeError {
                function: function.name.clone(),
                expected: expected.to_string(),
                received: actual.to_string(),
                position: index + 1,
            },
        };
        return Err(Error::new(error, argument.span.start.clone()));
    }

    tc.close_generics(&function.generics, &scope);
    let return_type = match &function.return_type {
        Type::Enum(enum_type) if !enum_type.generics.is_empty() => Type::instance(
            function.return_type.clone(),
            enum_type
                .generics
                .iter()
                .map(|generic| simplify_type(&Type::Generic(generic.clone()), &scope))
                .collect(),
        ),
        return_type => simplify_type(return_type, &scope),
    };

    Ok((return_type, scope))
}

fn type_of_call(tc: &mut TypeChecker, call: &mut Call, env: &Env, span: &Span) -> Result<Type, Error> {
    let callee = simplify_type(&type_of(tc, &mut call.callee, env)?, env);
    let Type::Function(function) = callee else {
        return Err(Error::new(
            ErrorImpl::NotCallable {
                found: call.callee.describe(),
            },
            call.callee.span.start.clone(),
        ));
    };

    let (return_type, scope) =
        type_check_arguments(tc, &mut call.arguments, &function, env, &span.start)?;

    call.dispatch = None;
    if let Some(interface) = function.interface() {
        let resolved = simplify_type(&Type::Generic(interface.generic.clone()), &scope);

        if let Some(key) = resolved.dispatch_key() {
            let symbol = format!("{}{}", function.name, key);

            if let Some(Type::Function(target)) = env.get(&symbol) {
                debug!(method = %function.name, %symbol, "resolved dispatch");
                call.dispatch = Some(Dispatch { symbol, target });
            }
        }
    }

    Ok(simplify_type(&return_type, env))
}

fn type_of_if(tc: &mut TypeChecker, if_node: &mut If, env: &Env, span: &Span) -> Result<Type, Error> {
    type_of(tc, &mut if_node.condition, env)?;
    let if_type = simplify_type(&type_of(tc, &mut if_node.if_body, env)?, env);

    let Some(else_body) = if_node.else_body.as_mut() else {
        return Ok(if_type);
    };
    let else_type = simplify_type(&type_of(tc, else_body, env)?, env);

    widen(Some(if_type), else_type, env).map_err(|(else_type, if_type)| {
        Error::new(
            ErrorImpl::BranchTypeMismatch {
                if_type: if_type.to_string(),
                else_type: else_type.to_string(),
            },
            span.start.clone(),
        )
    })
}

/// Joins `next` into `current`, preferring `current` when each accepts the
/// other. Hands both back when neither does.
///
/// Bindings made while comparing live in a throwaway scope and only show up
/// in the returned type.
fn widen(current: Option<Type>, next: Type, env: &Env) -> Result<Type, (Type, Type)> {
    let Some(current) = current else {
        return Ok(next);
    };

    let trial = env.child();
    if accepts(&current, &next, &trial) {
        return Ok(simplify_type(&current, &trial));
    }

    let trial = env.child();
    if accepts(&next, &current, &trial) {
        return Ok(simplify_type(&next, &trial));
    }

    Err((next, current))
}

fn type_of_list(tc: &mut TypeChecker, items: &mut [Node], env: &Env) -> Result<Type, Error> {
    let mut element = None;

    for item in items.iter_mut() {
        let ty = simplify_type(&type_of(tc, item, env)?, env);
        element = Some(widen(element, ty, env).map_err(|(found, inferred)| {
            Error::new(
                ErrorImpl::MixedListTypeError {
                    found: found.to_string(),
                    inferred: inferred.to_string(),
                },
                item.span.start.clone(),
            )
        })?);
    }

    let element = match element {
        Some(element) => simplify_type(&element, env),
        None => {
            let generic = tc.builtins.list_generic();
            tc.fresh_generic(&generic)
        }
    };
    Ok(tc.builtins.list_of(element))
}

fn type_of_match(
    tc: &mut TypeChecker,
    match_node: &mut Match,
    env: &Env,
    span: &Span,
) -> Result<Type, Error> {
    let subject = simplify_type(&type_of(tc, &mut match_node.value, env)?, env);

    if match_node.cases.is_empty() {
        return Err(Error::new(ErrorImpl::EmptyMatch, span.start.clone()));
    }

    let mut result = None;
    for case in match_node.cases.iter_mut() {
        let ty = simplify_type(&type_of_with(tc, case, env, Context::Subject(&subject))?, env);
        result = Some(widen(result, ty, env).map_err(|(found, inferred)| {
            Error::new(
                ErrorImpl::MixedMatchTypeError {
                    found: found.to_string(),
                    inferred: inferred.to_string(),
                },
                case.span.start.clone(),
            )
        })?);
    }

    Ok(result.map(|ty| simplify_type(&ty, env)).unwrap_or_else(|| tc.builtins.void.clone()))
}

fn lookup_pattern_constructor(
    pattern: &Pattern,
    env: &Env,
    span: &Span,
) -> Result<Rc<ConstructorType>, Error> {
    env.get(&pattern.constructor)
        .and_then(|ty| ty.as_constructor().cloned())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownConstructor {
                    constructor: pattern.constructor.clone(),
                },
                span.start.clone(),
            )
        })
}

/// The type a constructor builds, with the enum's generics left open.
fn owning_type(signature: &FunctionType) -> Type {
    match &signature.return_type {
        Type::Enum(enum_type) if !enum_type.generics.is_empty() => Type::instance(
            signature.return_type.clone(),
            enum_type.generics.iter().map(|g| Type::Generic(g.clone())).collect(),
        ),
        return_type => return_type.clone(),
    }
}

/// Binds the variables of `pattern_node` in `scope` and annotates the pattern.
///
/// The constructor's generics are solved against `value` where possible;
/// variables whose type stays open are bound to the generic itself.
fn bind_pattern(
    tc: &mut TypeChecker,
    pattern_node: &mut Node,
    constructor: &ConstructorType,
    value: Option<&Type>,
    scope: &Env,
) -> Result<(), Error> {
    let NodeKind::Pattern(pattern) = &pattern_node.kind else {
        return Ok(());
    };
    let signature = &constructor.signature;

    if pattern.bindings.len() != signature.params.len() {
        return Err(Error::new(
            ErrorImpl::ArityError {
                function: constructor.name.clone(),
                expected: signature.params.len(),
                received: pattern.bindings.len(),
            },
            pattern_node.span.start.clone(),
        ));
    }

    let constructor_scope = scope.child();
    for generic in &signature.generics {
        constructor_scope.set(generic, Type::Generic(generic.clone()));
    }

    let owner = owning_type(signature);
    if let Some(value) = value {
        unify(&owner, value, &constructor_scope);
    }
    tc.close_generics(&signature.generics, &constructor_scope);

    for (binding, param) in pattern.bindings.iter().zip(signature.params.iter()) {
        scope.set(&binding.name, simplify_type(param, &constructor_scope));
    }

    pattern_node.ty = Some(simplify_type(&owner, &constructor_scope));
    Ok(())
}

fn type_of_case(
    tc: &mut TypeChecker,
    case: &mut Case,
    env: &Env,
    subject: Option<&Type>,
) -> Result<Type, Error> {
    let NodeKind::Pattern(pattern) = &case.pattern.kind else {
        return Err(Error::new(
            ErrorImpl::UnknownConstructor {
                constructor: case.pattern.describe(),
            },
            case.pattern.span.start.clone(),
        ));
    };

    let constructor = lookup_pattern_constructor(pattern, env, &case.pattern.span)?;
    let scope = env.child();
    bind_pattern(tc, &mut case.pattern, &constructor, subject, &scope)?;

    type_of(tc, &mut case.body, &scope)
}

fn type_of_let(tc: &mut TypeChecker, let_node: &mut Let, env: &Env) -> Result<Type, Error> {
    let scope = env.child();

    for assignment in let_node.assignments.iter_mut() {
        type_of(tc, assignment, &scope)?;
    }

    type_of_with(tc, &mut let_node.block, &scope, Context::Scope(&scope))
}

fn type_of_assignment(
    tc: &mut TypeChecker,
    assignment: &mut Assignment,
    env: &Env,
) -> Result<Type, Error> {
    let value = simplify_type(&type_of(tc, &mut assignment.value, env)?, env);
    let left = assignment.left.as_mut();

    match &left.kind {
        NodeKind::Identifier(name) => {
            env.set(name, value.clone());
            left.ty = Some(value.clone());
        }
        NodeKind::Pattern(pattern) => {
            let constructor = lookup_pattern_constructor(pattern, env, &left.span)?;
            let owner = owning_type(&constructor.signature);

            if !is_assignable(&value, &owner, env) {
                return Err(Error::new(
                    ErrorImpl::PatternMismatch {
                        value: value.to_string(),
                        constructor: constructor.name.clone(),
                    },
                    left.span.start.clone(),
                ));
            }

            bind_pattern(tc, left, &constructor, Some(&value), env)?;
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnknownTypeError {
                    expression: left.describe(),
                },
                left.span.start.clone(),
            ))
        }
    }

    Ok(value)
}

fn type_of_constructor(
    tc: &mut TypeChecker,
    constructor: &mut Constructor,
    env: &Env,
    span: &Span,
) -> Result<Type, Error> {
    let ctor = env
        .get(&constructor.name)
        .and_then(|ty| ty.as_constructor().cloned())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedConstructor {
                    constructor: constructor.name.clone(),
                },
                span.start.clone(),
            )
        })?;

    let (return_type, _) =
        type_check_arguments(tc, &mut constructor.arguments, &ctor.signature, env, &span.start)?;
    Ok(return_type)
}

/// Type checks the whole program rooted at `root`.
///
/// On failure the error is rendered against `source` and returned as the
/// single fatal error of the pass.
pub fn type_check(
    root: &mut Node,
    env: &Env,
    source: &str,
    options: CheckerOptions,
) -> Result<Type, FatalError> {
    let result =
        TypeChecker::new(env, options).and_then(|mut tc| type_of(&mut tc, root, env));

    result.map_err(|err| {
        let report = render_error(&err, source);
        error!("{}", report);
        FatalError { report, error: err }
    })
}
