use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Function, Node, NodeKind, Parameter},
        types::{substitute, EnumType, FunctionType, ImplementationType, InterfaceType, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    type_checker::builtins::declare_constructor,
};

use super::{
    expr::{parse_block_expr, parse_delimited},
    parser::Parser,
    types::parse_type,
};

/// Parses one item: a declaration or an expression with an optional `;`.
pub fn parse_item(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    if let Some(handler) = parser.get_item_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.eat(TokenKind::Semicolon);

    Ok(vec![expr])
}

fn parse_generic_params(parser: &mut Parser) -> Result<Vec<String>, Error> {
    if !parser.eat(TokenKind::Less) {
        return Ok(vec![]);
    }

    parse_delimited(parser, TokenKind::Greater, |parser| {
        Ok(parser.expect(TokenKind::Identifier)?.value)
    })
}

/// `name<G>(a: A, b: B): R`, shared by functions, externs and interface
/// methods. Returns the parameter names alongside the signature.
fn parse_signature(parser: &mut Parser) -> Result<(Vec<Parameter>, FunctionType), Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected function name"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    let generics = parse_generic_params(parser)?;

    let (params, types, return_type) = parser.with_generics(&generics, |parser| {
        parser.expect(TokenKind::OpenParen)?;
        let params = parse_delimited(parser, TokenKind::CloseParen, |parser| {
            let token = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser)?;
            Ok((
                Parameter {
                    name: token.value,
                    span: token.span,
                },
                ty,
            ))
        })?;

        parser.expect(TokenKind::Colon)?;
        let return_type = parse_type(parser)?;

        let (params, types): (Vec<Parameter>, Vec<Type>) = params.into_iter().unzip();
        Ok((params, types, return_type))
    })?;

    Ok((params, FunctionType::new(name, types, return_type, generics)))
}

pub fn parse_fn_decl(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    let start = parser.advance().span.start.clone();

    let (params, signature) = parse_signature(parser)?;
    let body = parse_block_expr(parser)?;

    let name = signature.name.clone();
    parser.env.set(&name, Type::function(signature));

    Ok(vec![Node::new(
        NodeKind::Function(Function {
            name,
            params,
            body: Box::new(body),
        }),
        parser.span_from(start),
    )])
}

pub fn parse_extern_decl(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.advance();
    parser.expect(TokenKind::Fn)?;

    let (_, signature) = parse_signature(parser)?;
    parser.eat(TokenKind::Semicolon);

    parser.env.set(&signature.name.clone(), Type::function(signature));
    Ok(vec![])
}

pub fn parse_interface_decl(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Less)?;
    let generic = parser.expect(TokenKind::Identifier)?.value;
    if parser.current_token_kind() != TokenKind::Greater {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("interfaces take exactly one type parameter"),
            },
            parser.get_position(),
        ));
    }
    parser.advance();

    let prototypes = parser.with_generics(&[generic.clone()], |parser| {
        parser.expect(TokenKind::OpenCurly)?;

        let mut prototypes = vec![];
        while parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Fn)?;
            let (_, signature) = parse_signature(parser)?;
            parser.eat(TokenKind::Semicolon);
            prototypes.push(signature);
        }

        parser.expect(TokenKind::CloseCurly)?;
        Ok(prototypes)
    })?;

    let interface = Rc::new_cyclic(|interface| InterfaceType {
        name: name.clone(),
        generic,
        methods: prototypes
            .into_iter()
            .map(|mut method| {
                method.interface = Some(interface.clone());
                (method.name.clone(), Rc::new(method))
            })
            .collect(),
        implementations: RefCell::new(HashMap::new()),
    });

    for (method_name, method) in &interface.methods {
        parser.env.set(method_name, Type::Function(Rc::clone(method)));
    }
    parser.types.insert(name, Type::Interface(interface));

    Ok(vec![])
}

pub fn parse_implementation_decl(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.advance();

    let interface_token = parser.expect(TokenKind::Identifier)?;
    let Some(Type::Interface(interface)) = parser.types.get(&interface_token.value).cloned() else {
        return Err(Error::new(
            ErrorImpl::UnknownInterface {
                interface: interface_token.value,
            },
            interface_token.span.start,
        ));
    };

    parser.expect(TokenKind::Less)?;
    let type_position = parser.get_position();
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Greater)?;

    let Some(key) = ty.dispatch_key() else {
        return Err(Error::new(
            ErrorImpl::UnknownType {
                type_: ty.to_string(),
            },
            type_position,
        ));
    };

    if interface.implementations.borrow().contains_key(&key) {
        return Err(Error::new(
            ErrorImpl::DuplicateImplementation {
                interface: interface.name.clone(),
                type_: key,
            },
            type_position,
        ));
    }
    interface.implementations.borrow_mut().insert(
        key.clone(),
        Rc::new(ImplementationType {
            ty: ty.clone(),
            interface: interface.name.clone(),
        }),
    );

    parser.expect(TokenKind::OpenCurly)?;

    let mut functions = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let start = parser.expect(TokenKind::Fn)?.span.start;
        let method_token = parser.expect(TokenKind::Identifier)?;

        let Some(method) = interface.methods.get(&method_token.value).cloned() else {
            return Err(Error::new(
                ErrorImpl::UnknownMethod {
                    interface: interface.name.clone(),
                    method: method_token.value,
                },
                method_token.span.start,
            ));
        };

        parser.expect(TokenKind::OpenParen)?;
        let params = parse_delimited(parser, TokenKind::CloseParen, |parser| {
            let token = parser.expect(TokenKind::Identifier)?;
            Ok(Parameter {
                name: token.value,
                span: token.span,
            })
        })?;
        let body = parse_block_expr(parser)?;

        // `show` implemented for `Int` is declared as `showInt`
        let mangled = format!("{}{}", method.name, key);
        let signature = FunctionType::new(
            mangled.clone(),
            method.params.iter().map(|param| substitute(param, &interface.generic, &ty)).collect(),
            substitute(&method.return_type, &interface.generic, &ty),
            method.generics.clone(),
        );
        parser.env.set(&mangled, Type::function(signature));

        functions.push(Node::new(
            NodeKind::Function(Function {
                name: mangled,
                params,
                body: Box::new(body),
            }),
            parser.span_from(start),
        ));
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(functions)
}

pub fn parse_enum_decl(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier)?.value;
    let generics = parse_generic_params(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    // Registered up front so constructors can refer to the enum itself
    let enum_type = Rc::new(EnumType {
        name: name.clone(),
        generics: generics.clone(),
        constructors: parser.peek_constructor_names(),
    });
    parser.types.insert(name, Type::Enum(Rc::clone(&enum_type)));

    let constructors = parser.with_generics(&generics, |parser| {
        parse_delimited(parser, TokenKind::CloseCurly, |parser| {
            let constructor = parser.expect(TokenKind::Identifier)?.value;
            let params = if parser.eat(TokenKind::OpenParen) {
                parse_delimited(parser, TokenKind::CloseParen, parse_type)?
            } else {
                vec![]
            };
            Ok((constructor, params))
        })
    })?;

    for (constructor, params) in constructors {
        declare_constructor(&parser.env, &enum_type, &constructor, params);
    }

    Ok(vec![])
}
