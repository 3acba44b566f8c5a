use crate::ast::types::Type;

use super::env::Env;

/// Resolves generics and interface parameters bound in `env`, returning a new
/// type. Declarations reachable from `ty` are left untouched.
pub fn simplify_type(ty: &Type, env: &Env) -> Type {
    simplify(ty, env, &mut vec![])
}

// `resolving` holds the generic names currently being followed, so a binding
// cycle stops at the first repeated name.
fn simplify(ty: &Type, env: &Env, resolving: &mut Vec<String>) -> Type {
    match ty {
        Type::Generic(name) => {
            if resolving.contains(name) {
                return ty.clone();
            }

            match env.get(name) {
                Some(bound) if !bound.is_generic_named(name) => {
                    resolving.push(name.clone());
                    let resolved = simplify(&bound, env, resolving);
                    resolving.pop();
                    resolved
                }
                _ => ty.clone(),
            }
        }
        Type::DataTypeInstance(instance) => Type::instance(
            simplify(&instance.data_type, env, resolving),
            instance.types.iter().map(|t| simplify(t, env, resolving)).collect(),
        ),
        Type::Interface(interface) => {
            if resolving.contains(&interface.generic) {
                return ty.clone();
            }

            match env.get(&interface.generic) {
                Some(bound) if !matches!(bound, Type::Generic(_)) && bound != *ty => {
                    resolving.push(interface.generic.clone());
                    let resolved = simplify(&bound, env, resolving);
                    resolving.pop();
                    resolved
                }
                _ => ty.clone(),
            }
        }
        _ => ty.clone(),
    }
}
