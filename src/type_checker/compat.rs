//! Type compatibility.
//!
//! `is_assignable` answers whether a value of type `actual` may flow where
//! `expected` is required, without touching the environment. `unify` performs
//! the same check and, on success, commits the generic bindings it discovered
//! into the given scope. `accepts` is the combination used by the checker.

use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::ast::types::{InterfaceType, Type};

use super::env::Env;

/// Generic bindings discovered during a single query, not yet committed.
type Pending = HashMap<String, Type>;

pub fn is_assignable(expected: &Type, actual: &Type, env: &Env) -> bool {
    solve(expected, actual, env, &mut Pending::new())
}

/// Checks compatibility and commits the discovered generic bindings to `env`.
///
/// Nothing is written when the check fails.
pub fn unify(expected: &Type, actual: &Type, env: &Env) -> bool {
    let mut pending = Pending::new();
    if !solve(expected, actual, env, &mut pending) {
        return false;
    }

    for (name, ty) in pending {
        trace!(generic = %name, bound = %ty, "binding generic");
        env.set(&name, ty);
    }
    true
}

pub fn accepts(expected: &Type, actual: &Type, env: &Env) -> bool {
    is_assignable(expected, actual, env) && unify(expected, actual, env)
}

/// Follows generic-to-generic bindings until a concrete type is found.
///
/// Returns the name of the last unbound generic in the chain when there is no
/// concrete binding, including on a cycle.
fn resolve_generic(name: &str, env: &Env, pending: &Pending) -> Result<Type, String> {
    let mut current = name.to_string();
    let mut seen = vec![];

    loop {
        seen.push(current.clone());
        let next = pending.get(&current).cloned().or_else(|| env.get(&current));

        match next {
            Some(Type::Generic(next)) if !seen.contains(&next) => current = next,
            Some(Type::Generic(_)) | None => return Err(current),
            Some(ty) => return Ok(ty),
        }
    }
}

fn solve(expected: &Type, actual: &Type, env: &Env, pending: &mut Pending) -> bool {
    if let Type::Generic(name) = expected {
        return match resolve_generic(name, env, pending) {
            Ok(bound) => solve(&bound, actual, env, pending),
            Err(unbound) => {
                if !actual.is_generic_named(&unbound) {
                    pending.insert(unbound, actual.clone());
                }
                true
            }
        };
    }

    match (expected, actual) {
        (Type::Interface(interface), _) => solve_interface(interface, actual, env, pending),
        (_, Type::Generic(_)) => false,
        (Type::Basic(a), Type::Basic(b)) => a == b,
        (Type::DataTypeInstance(e), Type::DataTypeInstance(a)) => {
            e.data_type.same_declaration(&a.data_type)
                && e.types.len() == a.types.len()
                && e.types.iter().zip(a.types.iter()).all(|(e, a)| {
                    // An unresolved element type (`[]`, a bare `None`) constrains nothing
                    matches!(a, Type::Generic(_)) || solve(e, a, env, pending)
                })
        }
        (Type::DataTypeInstance(instance), Type::Enum(enum_type))
        | (Type::Enum(enum_type), Type::DataTypeInstance(instance)) => {
            matches!(instance.data_type.as_ref(), Type::Enum(e) if Rc::ptr_eq(e, enum_type))
        }
        (Type::Enum(a), Type::Enum(b)) => Rc::ptr_eq(a, b),
        (Type::DataType(a), Type::DataType(b)) => Rc::ptr_eq(a, b),
        (Type::Function(e), Type::Function(a)) => {
            e.params.len() == a.params.len()
                && e.params.iter().zip(a.params.iter()).all(|(e, a)| solve(e, a, env, pending))
                && solve(&e.return_type, &a.return_type, env, pending)
        }
        _ => false,
    }
}

fn solve_interface(
    interface: &Rc<InterfaceType>,
    actual: &Type,
    env: &Env,
    pending: &mut Pending,
) -> bool {
    if let Type::Interface(other) = actual {
        if Rc::ptr_eq(interface, other) {
            return true;
        }
    }

    match resolve_generic(&interface.generic, env, pending) {
        Ok(Type::Interface(bound)) if Rc::ptr_eq(&bound, interface) => {
            bind_implementation(interface, actual, pending)
        }
        Ok(bound) => solve(&bound, actual, env, pending),
        Err(_) => bind_implementation(interface, actual, pending),
    }
}

fn bind_implementation(interface: &InterfaceType, actual: &Type, pending: &mut Pending) -> bool {
    if !interface.is_implemented_by(actual) {
        return false;
    }

    pending.insert(interface.generic.clone(), actual.clone());
    true
}
