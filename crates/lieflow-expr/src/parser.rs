//! Parser for the expression syntax.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | 'pi' | ident | ident '(' sum ')' | '(' sum ')'
//! ```
//!
//! Exponentiation is right-associative and binds tighter than unary minus,
//! so `-x^2` is `-(x^2)`.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::{ExprError, ExprResult};
use crate::expr::Expr;
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse an expression from source text.
///
/// ```rust
/// use lieflow_expr::{parse, Expr};
///
/// let h = parse("p_x^2 / 2 + p_s").unwrap();
/// assert_eq!(h, Expr::from(0.5) * Expr::pow(Expr::symbol("p_x"), Expr::from(2.0)) + Expr::symbol("p_s"));
/// ```
pub fn parse(source: &str) -> ExprResult<Expr> {
    let mut parser = Parser::new(source)?;
    let expr = parser.parse_sum()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(extra) => Err(ExprError::UnexpectedToken {
            position: extra.span.start,
            expected: "end of input".into(),
            found: extra.token.to_string(),
        }),
    }
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(source: &str) -> ExprResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(ExprError::Lexer {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            end: source.len(),
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span.start)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> ExprResult<()> {
        let position = self.position();
        match self.advance() {
            Some(ref found) if found == expected => Ok(()),
            Some(found) => Err(ExprError::UnexpectedToken {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            }),
            None => Err(ExprError::UnexpectedEof(expected.to_string())),
        }
    }

    fn parse_sum(&mut self) -> ExprResult<Expr> {
        let mut terms = vec![self.parse_product()?];
        loop {
            if self.consume(&Token::Plus) {
                terms.push(self.parse_product()?);
            } else if self.consume(&Token::Minus) {
                terms.push(-self.parse_product()?);
            } else {
                break;
            }
        }
        Ok(Expr::add(terms))
    }

    fn parse_product(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.consume(&Token::Star) {
                lhs = lhs * self.parse_unary()?;
            } else if self.consume(&Token::Slash) {
                lhs = lhs / self.parse_unary()?;
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> ExprResult<Expr> {
        let base = self.parse_primary()?;
        if self.consume(&Token::Caret) || self.consume(&Token::Power) {
            let exp = self.parse_unary()?;
            return Ok(Expr::pow(base, exp));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> ExprResult<Expr> {
        let position = self.position();
        let token = self
            .advance()
            .ok_or_else(|| ExprError::UnexpectedEof("expression".into()))?;

        match token {
            Token::Number(v) => Ok(Expr::number(v)),
            Token::Identifier(name) => {
                if self.consume(&Token::LParen) {
                    let arg = self.parse_sum()?;
                    self.expect(&Token::RParen)?;
                    apply_function(&name, arg)
                } else if name == "pi" {
                    Ok(Expr::number(PI))
                } else {
                    Ok(Expr::symbol(name))
                }
            }
            Token::LParen => {
                let expr = self.parse_sum()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(ExprError::UnexpectedToken {
                position,
                expected: "expression".into(),
                found: other.to_string(),
            }),
        }
    }
}

fn apply_function(name: &str, arg: Expr) -> ExprResult<Expr> {
    match name {
        "exp" => Ok(Expr::exp(arg)),
        "ln" | "log" => Ok(Expr::ln(arg)),
        "sin" => Ok(Expr::sin(arg)),
        "cos" => Ok(Expr::cos(arg)),
        "sqrt" => Ok(Expr::sqrt(arg)),
        other => Err(ExprError::UnknownFunction(other.to_string())),
    }
}
