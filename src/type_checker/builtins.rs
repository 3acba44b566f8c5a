//! Builtin types.
//!
//! Basic types are registered in the root environment under lowercase keys
//! (`int`, `string`, ...) and in the annotation namespace under their surface
//! names (`Int`, `String`, ...). `List<T>` is an ordinary enum with the
//! constructors `Nil` and `Cons(T, List<T>)`.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::types::{ConstructorType, EnumType, FunctionType, Type},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::env::Env;

const BASIC_TYPES: [&str; 5] = ["Int", "Float", "Char", "Void", "String"];

pub fn declare_builtins(env: &Env, types: &mut HashMap<String, Type>) {
    for name in BASIC_TYPES {
        let ty = Type::basic(name);
        env.set(&name.to_lowercase(), ty.clone());
        types.insert(name.to_string(), ty);
    }

    let list = Rc::new(EnumType {
        name: String::from("List"),
        generics: vec![String::from("T")],
        constructors: vec![String::from("Nil"), String::from("Cons")],
    });
    let list_type = Type::Enum(Rc::clone(&list));
    let element = Type::generic("T");

    declare_constructor(env, &list, "Nil", vec![]);
    declare_constructor(
        env,
        &list,
        "Cons",
        vec![element.clone(), Type::instance(list_type.clone(), vec![element])],
    );

    env.set("list", list_type.clone());
    types.insert(String::from("List"), list_type);
}

/// Registers a constructor of `owner` in `env`.
pub fn declare_constructor(env: &Env, owner: &Rc<EnumType>, name: &str, params: Vec<Type>) {
    let signature = FunctionType::new(
        name.to_string(),
        params,
        Type::Enum(Rc::clone(owner)),
        owner.generics.clone(),
    );

    env.set(
        name,
        Type::Constructor(Rc::new(ConstructorType {
            name: name.to_string(),
            signature: Rc::new(signature),
        })),
    );
}

/// The builtin types the checker refers to directly.
#[derive(Debug, Clone)]
pub struct Builtins {
    pub int: Type,
    pub float: Type,
    pub string: Type,
    pub void: Type,
    pub list: Type,
}

impl Builtins {
    pub fn from_env(env: &Env) -> Result<Builtins, Error> {
        let get = |key: &str| {
            env.get(key).ok_or_else(|| {
                Error::new(ErrorImpl::UnknownType { type_: key.to_string() }, Position::null())
            })
        };

        Ok(Builtins {
            int: get("int")?,
            float: get("float")?,
            string: get("string")?,
            void: get("void")?,
            list: get("list")?,
        })
    }

    pub fn list_of(&self, element: Type) -> Type {
        Type::instance(self.list.clone(), vec![element])
    }

    /// Name of the list's element generic.
    pub fn list_generic(&self) -> String {
        match &self.list {
            Type::Enum(list) => list.generics.first().cloned().unwrap_or_else(|| String::from("T")),
            _ => String::from("T"),
        }
    }
}
