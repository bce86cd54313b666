//! Expression parsing with standard SQL precedence.
//!
//! From loosest to tightest: `OR`, `AND`, `NOT`, `IS [NOT] ...`,
//! comparisons, `+ -`, `* / %`, unary minus, primaries.

use crate::ast::{
    ArithmeticOperator, BuiltinCall, ComparisonOperator, Expression, FunctionCall, Literal,
    LogicalOperator, TypeTest,
};
use crate::lexer::token::TokenKind;
use crate::parser::base::ParseResult;
use crate::parser::select::QueryParser;
use smol_str::SmolStr;

impl<'a> QueryParser<'a> {
    /// Parses an expression.
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_or_expression()
    }

    /// Parses one or more comma-separated expressions.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut items = vec![self.parse_expression()?];
        while self.stream.consume(&TokenKind::Comma) {
            items.push(self.parse_expression()?);
        }
        Ok(items)
    }

    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_expression()?;

        while self.stream.consume(&TokenKind::Or) {
            let right = self.parse_and_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Logical(LogicalOperator::Or, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not_expression()?;

        while self.stream.consume(&TokenKind::And) {
            let right = self.parse_not_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Logical(LogicalOperator::And, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_not_expression(&mut self) -> ParseResult<Expression> {
        if self.stream.check(&TokenKind::Not) {
            let start = self.stream.current().span.start;
            self.stream.advance();
            let operand = self.parse_not_expression()?;
            let span = start..operand.span().end;
            Ok(Expression::Not(Box::new(operand), span))
        } else {
            self.parse_is_expression()
        }
    }

    fn parse_is_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_comparison_expression()?;

        while self.stream.consume(&TokenKind::Is) {
            let negated = self.stream.consume(&TokenKind::Not);
            let token = self.stream.current();
            let test = match &token.kind {
                TokenKind::Null => TypeTest::Null,
                TokenKind::True => TypeTest::True,
                TokenKind::False => TypeTest::False,
                TokenKind::Identifier(name) => match name.to_ascii_lowercase().as_str() {
                    "string" => TypeTest::String,
                    "number" => TypeTest::Number,
                    "integer" => TypeTest::Integer,
                    "timestamp" => TypeTest::Timestamp,
                    _ => return Err(self.unknown_type_test()),
                },
                _ => return Err(self.unknown_type_test()),
            };
            self.stream.advance();
            let span = expr.span().start..token.span.end;
            expr = Expression::IsType(Box::new(expr), test, negated, span);
        }

        Ok(expr)
    }

    fn unknown_type_test(&self) -> crate::parser::base::ParseError {
        self.stream.error_here_with_code(
            format!(
                "expected NULL, TRUE, FALSE, STRING, NUMBER, INTEGER or TIMESTAMP after IS, found {}",
                self.stream.current().kind
            ),
            "syntax::unknown_type_test",
        )
    }

    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        let left = self.parse_additive_expression()?;

        let op = match self.stream.current().kind {
            TokenKind::Eq => ComparisonOperator::Eq,
            TokenKind::NotEq => ComparisonOperator::NotEq,
            TokenKind::Lt => ComparisonOperator::Lt,
            TokenKind::LtEq => ComparisonOperator::LtEq,
            TokenKind::Gt => ComparisonOperator::Gt,
            TokenKind::GtEq => ComparisonOperator::GtEq,
            _ => return Ok(left),
        };
        self.stream.advance();

        let right = self.parse_additive_expression()?;
        let span = left.span().start..right.span().end;
        Ok(Expression::Comparison(
            op,
            Box::new(left),
            Box::new(right),
            span,
        ))
    }

    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match self.stream.current().kind {
                TokenKind::Plus => ArithmeticOperator::Add,
                TokenKind::Minus => ArithmeticOperator::Subtract,
                _ => return Ok(left),
            };
            self.stream.advance();
            let right = self.parse_multiplicative_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Arithmetic(op, Box::new(left), Box::new(right), span);
        }
    }

    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match self.stream.current().kind {
                TokenKind::Star => ArithmeticOperator::Multiply,
                TokenKind::Slash => ArithmeticOperator::Divide,
                TokenKind::Percent => ArithmeticOperator::Modulo,
                _ => return Ok(left),
            };
            self.stream.advance();
            let right = self.parse_unary_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Arithmetic(op, Box::new(left), Box::new(right), span);
        }
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        if !self.stream.check(&TokenKind::Minus) {
            return self.parse_primary_expression();
        }

        let start = self.stream.current().span.start;
        self.stream.advance();
        let operand = self.parse_unary_expression()?;
        let span = start..operand.span().end;

        // A negative number stays a constant.
        Ok(match operand {
            Expression::Constant(Literal::Integer(text), _) => {
                Expression::Constant(Literal::Integer(SmolStr::new(format!("-{text}"))), span)
            }
            Expression::Constant(Literal::Float(text), _) => {
                Expression::Constant(Literal::Float(SmolStr::new(format!("-{text}"))), span)
            }
            operand => Expression::Negation(Box::new(operand), span),
        })
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let token = self.stream.current();
        let span = token.span.clone();

        let literal = match &token.kind {
            TokenKind::Integer(text) => Some(Literal::Integer(text.clone())),
            TokenKind::Float(text) => Some(Literal::Float(text.clone())),
            TokenKind::String(text) => Some(Literal::String(text.clone())),
            TokenKind::True => Some(Literal::Boolean(true)),
            TokenKind::False => Some(Literal::Boolean(false)),
            TokenKind::Null => Some(Literal::Null),
            _ => None,
        };
        if let Some(literal) = literal {
            self.stream.advance();
            return Ok(Expression::Constant(literal, span));
        }

        match &token.kind {
            TokenKind::LParen => {
                self.stream.advance();
                let inner = self.parse_expression()?;
                self.stream.expect_closing(TokenKind::RParen, span)?;
                Ok(inner)
            }
            TokenKind::LBrace => {
                self.stream.advance();
                let clauses = if self.stream.check(&TokenKind::RBrace) {
                    Vec::new()
                } else {
                    self.parse_select_list()?
                };
                let end = self
                    .stream
                    .expect_closing(TokenKind::RBrace, span.clone())?
                    .end;
                Ok(Expression::Within(clauses, span.start..end))
            }
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                if matches!(
                    self.stream.peek().map(|t| &t.kind),
                    Some(TokenKind::LParen)
                ) {
                    self.parse_call()
                } else {
                    let name = self.parse_qualified_name()?;
                    Ok(Expression::ReadVariable(name.node, name.span))
                }
            }
            other => Err(self.stream.error_here_with_code(
                format!("expected expression, found {other}"),
                "syntax::expected_expression",
            )),
        }
    }

    /// Parses `name(args)` and an optional `[extract]` suffix.
    ///
    /// With the suffix the call is a user function application, without it
    /// a builtin call.
    fn parse_call(&mut self) -> ParseResult<Expression> {
        let name = self.parse_name()?;
        let open = self.stream.expect(TokenKind::LParen)?;
        let arguments = if self.stream.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        let close = self.stream.expect_closing(TokenKind::RParen, open)?;

        if self.stream.check(&TokenKind::LBracket) {
            let open = self.stream.current().span.clone();
            self.stream.advance();
            let extract = self.parse_expression()?;
            let end = self.stream.expect_closing(TokenKind::RBracket, open)?.end;
            return Ok(Expression::FunctionCall(FunctionCall {
                name: name.node,
                arguments,
                extract: Box::new(extract),
                span: name.span.start..end,
            }));
        }

        Ok(Expression::BuiltinCall(BuiltinCall {
            name: name.node,
            arguments,
            span: name.span.start..close.end,
        }))
    }
}
