use crate::{
    ast::ast::{
        Assignment, BinaryOperation, Call, Case, Constructor, If, Let, Match, Node, NodeKind,
        NumberLiteral, Parameter, Pattern, UnaryOperation,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_item};

fn unexpected(parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::UnexpectedToken {
            token: parser.current_token().value.clone(),
        },
        parser.get_position(),
    )
}

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(unexpected(parser));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(unexpected(parser));
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Number => {
            let number = if token.value.contains('.') {
                token.value.parse().map(NumberLiteral::Float).ok()
            } else {
                token.value.parse().map(NumberLiteral::Int).ok()
            };

            let Some(number) = number else {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ));
            };

            parser.advance();
            Ok(Node::new(NodeKind::Number(number), token.span))
        }
        TokenKind::Identifier if token.is_capitalised() => parse_constructor_expr(parser),
        TokenKind::Identifier => {
            parser.advance();
            Ok(Node::new(NodeKind::Identifier(token.value), token.span))
        }
        TokenKind::String => {
            parser.advance();
            Ok(Node::new(NodeKind::String(token.value), token.span))
        }
        _ => Err(unexpected(parser)),
    }
}

/// Parses a comma separated list of `item` up to and including `close`.
pub fn parse_delimited<T>(
    parser: &mut Parser,
    close: TokenKind,
    mut item: impl FnMut(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(item(parser)?);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(close)?;
    Ok(items)
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.expect(TokenKind::OpenParen)?;
    parse_delimited(parser, TokenKind::CloseParen, |parser| {
        parse_expr(parser, BindingPower::Default)
    })
}

pub fn parse_constructor_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    let arguments = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_arguments(parser)?
    } else {
        vec![]
    };

    Ok(Node::new(
        NodeKind::Constructor(Constructor {
            name: token.value,
            arguments,
        }),
        parser.span_from(token.span.start),
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    let operator = parser.advance().kind;
    let right = parse_expr(parser, bp)?;

    let span = Span::new(left.span.start.clone(), right.span.end.clone());
    Ok(Node::new(
        NodeKind::BinaryOperation(BinaryOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Node, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span::new(operator_token.span.start, operand.span.end.clone());
    Ok(Node::new(
        NodeKind::UnaryOperation(UnaryOperation {
            operator: operator_token.kind,
            operand: Box::new(operand),
        }),
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Node, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    let start = left.span.start.clone();
    let arguments = parse_arguments(parser)?;

    Ok(Node::new(
        NodeKind::Call(Call {
            callee: Box::new(left),
            arguments,
            dispatch: None,
        }),
        parser.span_from(start),
    ))
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    let items = parse_delimited(parser, TokenKind::CloseBracket, |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(Node::new(NodeKind::List(items), parser.span_from(start)))
}

pub fn parse_block_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut nodes = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(unexpected(parser));
        }
        nodes.extend(parse_item(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Node::new(NodeKind::Block(nodes), parser.span_from(start)))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let if_body = parse_block_expr(parser)?;

    let else_body = if parser.eat(TokenKind::Else) {
        if parser.current_token_kind() == TokenKind::If {
            Some(Box::new(parse_if_expr(parser)?))
        } else {
            Some(Box::new(parse_block_expr(parser)?))
        }
    } else {
        None
    };

    Ok(Node::new(
        NodeKind::If(If {
            condition: Box::new(condition),
            if_body: Box::new(if_body),
            else_body,
        }),
        parser.span_from(start),
    ))
}

fn parse_binding(parser: &mut Parser) -> Result<Parameter, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Parameter {
        name: token.value,
        span: token.span,
    })
}

pub fn parse_pattern(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.current_token().clone();
    if !token.is_capitalised() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("expected a constructor pattern"),
            },
            token.span.start,
        ));
    }
    parser.advance();

    let bindings = if parser.eat(TokenKind::OpenParen) {
        parse_delimited(parser, TokenKind::CloseParen, parse_binding)?
    } else {
        vec![]
    };

    Ok(Node::new(
        NodeKind::Pattern(Pattern {
            constructor: token.value,
            bindings,
        }),
        parser.span_from(token.span.start),
    ))
}

fn parse_assignment(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_position();

    let left = if parser.current_token().is_capitalised() {
        parse_pattern(parser)?
    } else {
        let binding = parse_binding(parser)?;
        Node::new(NodeKind::Identifier(binding.name), binding.span)
    };

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Node::new(
        NodeKind::Assignment(Assignment {
            left: Box::new(left),
            value: Box::new(value),
        }),
        parser.span_from(start),
    ))
}

pub fn parse_let_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let mut assignments = vec![parse_assignment(parser)?];
    while parser.eat(TokenKind::Comma) {
        assignments.push(parse_assignment(parser)?);
    }

    let block = parse_block_expr(parser)?;

    Ok(Node::new(
        NodeKind::Let(Let {
            assignments,
            block: Box::new(block),
        }),
        parser.span_from(start),
    ))
}

fn parse_case(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_position();

    let pattern = parse_pattern(parser)?;
    parser.expect(TokenKind::FatArrow)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Node::new(
        NodeKind::Case(Case {
            pattern: Box::new(pattern),
            body: Box::new(body),
        }),
        parser.span_from(start),
    ))
}

pub fn parse_match_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut cases = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        cases.push(parse_case(parser)?);
        parser.eat(TokenKind::Comma);
    }
    parser.expect(TokenKind::CloseCurly)?;

    Ok(Node::new(
        NodeKind::Match(Match {
            value: Box::new(value),
            cases,
        }),
        parser.span_from(start),
    ))
}
