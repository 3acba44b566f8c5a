//! Type system definitions.
//!
//! This module defines the closed set of types the checker reasons about:
//!
//! - Nominal atomic types (`Int`, `Float`, `String`, ...)
//! - Generic placeholders and applied type constructors (`List<Int>`)
//! - Function signatures, optionally owned by an interface
//! - Interfaces with their implementation tables
//! - Enums and their constructors
//!
//! Declarations are created once by the parser and shared through `Rc`. The
//! checker never mutates them; simplification builds new values instead.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Display},
    rc::{Rc, Weak},
};

#[derive(Debug, Clone)]
pub enum Type {
    Basic(String),
    DataType(Rc<DataType>),
    DataTypeInstance(DataTypeInstance),
    Generic(String),
    Function(Rc<FunctionType>),
    Interface(Rc<InterfaceType>),
    Implementation(Rc<ImplementationType>),
    Enum(Rc<EnumType>),
    Constructor(Rc<ConstructorType>),
}

/// An unapplied type constructor such as `List`.
#[derive(Debug)]
pub struct DataType {
    pub name: String,
    pub arity: usize,
}

/// A type constructor applied to arguments, e.g. `List<Int>`.
#[derive(Debug, Clone)]
pub struct DataTypeInstance {
    pub data_type: Box<Type>,
    pub types: Vec<Type>,
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub generics: Vec<String>,
    pub interface: Option<Weak<InterfaceType>>,
}

impl FunctionType {
    pub fn new(name: String, params: Vec<Type>, return_type: Type, generics: Vec<String>) -> Self {
        FunctionType {
            name,
            params,
            return_type,
            generics,
            interface: None,
        }
    }

    /// The interface this function is a method of, if any.
    pub fn interface(&self) -> Option<Rc<InterfaceType>> {
        self.interface.as_ref().and_then(Weak::upgrade)
    }
}

/// An ad hoc polymorphic contract over a single generic parameter.
#[derive(Debug)]
pub struct InterfaceType {
    pub name: String,
    pub generic: String,
    pub methods: HashMap<String, Rc<FunctionType>>,
    /// Keyed by [`Type::dispatch_key`] of the implementing type.
    pub implementations: RefCell<HashMap<String, Rc<ImplementationType>>>,
}

impl InterfaceType {
    pub fn implementation_for(&self, ty: &Type) -> Option<Rc<ImplementationType>> {
        let key = ty.dispatch_key()?;
        self.implementations.borrow().get(&key).cloned()
    }

    pub fn is_implemented_by(&self, ty: &Type) -> bool {
        self.implementation_for(ty).is_some()
    }
}

#[derive(Debug)]
pub struct ImplementationType {
    pub ty: Type,
    pub interface: String,
}

#[derive(Debug)]
pub struct EnumType {
    pub name: String,
    pub generics: Vec<String>,
    pub constructors: Vec<String>,
}

#[derive(Debug)]
pub struct ConstructorType {
    pub name: String,
    pub signature: Rc<FunctionType>,
}

impl Type {
    pub fn basic(name: &str) -> Type {
        Type::Basic(name.to_string())
    }

    pub fn generic(name: &str) -> Type {
        Type::Generic(name.to_string())
    }

    pub fn instance(data_type: Type, types: Vec<Type>) -> Type {
        Type::DataTypeInstance(DataTypeInstance {
            data_type: Box::new(data_type),
            types,
        })
    }

    pub fn function(function: FunctionType) -> Type {
        Type::Function(Rc::new(function))
    }

    pub fn is_generic_named(&self, name: &str) -> bool {
        matches!(self, Type::Generic(n) if n == name)
    }

    pub fn as_function(&self) -> Option<&Rc<FunctionType>> {
        match self {
            Type::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&Rc<ConstructorType>> {
        match self {
            Type::Constructor(constructor) => Some(constructor),
            _ => None,
        }
    }

    /// Name used to key interface implementations and to mangle dispatched
    /// method names. Only concrete nominal types have one.
    pub fn dispatch_key(&self) -> Option<String> {
        match self {
            Type::Basic(name) => Some(name.clone()),
            Type::DataType(data_type) => Some(data_type.name.clone()),
            Type::Enum(enum_type) => Some(enum_type.name.clone()),
            Type::DataTypeInstance(instance) => instance.data_type.dispatch_key(),
            Type::Generic(_)
            | Type::Function(_)
            | Type::Interface(_)
            | Type::Implementation(_)
            | Type::Constructor(_) => None,
        }
    }

    /// Whether two type constructors denote the same declaration.
    pub fn same_declaration(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Enum(a), Type::Enum(b)) => Rc::ptr_eq(a, b),
            (Type::DataType(a), Type::DataType(b)) => Rc::ptr_eq(a, b),
            (Type::Interface(a), Type::Interface(b)) => Rc::ptr_eq(a, b),
            (Type::Basic(a), Type::Basic(b)) => a == b,
            _ => false,
        }
    }
}

/// Replaces every occurrence of the generic `name` inside `ty`.
pub fn substitute(ty: &Type, name: &str, replacement: &Type) -> Type {
    match ty {
        Type::Generic(n) if n == name => replacement.clone(),
        Type::DataTypeInstance(instance) => Type::instance(
            substitute(&instance.data_type, name, replacement),
            instance.types.iter().map(|t| substitute(t, name, replacement)).collect(),
        ),
        Type::Function(function) => Type::function(FunctionType {
            params: function.params.iter().map(|t| substitute(t, name, replacement)).collect(),
            return_type: substitute(&function.return_type, name, replacement),
            ..(**function).clone()
        }),
        _ => ty.clone(),
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Basic(a), Type::Basic(b)) => a == b,
            (Type::Generic(a), Type::Generic(b)) => a == b,
            (Type::DataType(a), Type::DataType(b)) => Rc::ptr_eq(a, b),
            (Type::DataTypeInstance(a), Type::DataTypeInstance(b)) => {
                a.data_type == b.data_type && a.types == b.types
            }
            (Type::Function(a), Type::Function(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.name == b.name && a.params == b.params && a.return_type == b.return_type)
            }
            (Type::Interface(a), Type::Interface(b)) => Rc::ptr_eq(a, b),
            (Type::Implementation(a), Type::Implementation(b)) => Rc::ptr_eq(a, b),
            (Type::Enum(a), Type::Enum(b)) => Rc::ptr_eq(a, b),
            (Type::Constructor(a), Type::Constructor(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn join(types: &[Type]) -> String {
    types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(name) => write!(f, "{}", name),
            // Instantiated placeholders (`T#3`) print as their declared name
            Type::Generic(name) => write!(f, "{}", name.split('#').next().unwrap_or(name)),
            Type::DataType(data_type) => write!(f, "{}", data_type.name),
            Type::DataTypeInstance(instance) => {
                write!(f, "{}<{}>", instance.data_type, join(&instance.types))
            }
            Type::Function(function) => {
                write!(f, "fn({}): {}", join(&function.params), function.return_type)
            }
            Type::Interface(interface) => write!(f, "{}", interface.name),
            Type::Implementation(implementation) => {
                write!(f, "{}<{}>", implementation.interface, implementation.ty)
            }
            Type::Enum(enum_type) => write!(f, "{}", enum_type.name),
            Type::Constructor(constructor) => write!(f, "{}", constructor.name),
        }
    }
}
