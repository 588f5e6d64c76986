//! Expression parser and evaluator for scaling steps.
//!
//! Implements a recursive descent parser for the restricted arithmetic
//! grammar accepted in `expression`-typed scaling operations. There is no
//! dynamic code evaluation: expression strings are tokenized, parsed into an
//! AST and walked directly.
//!
//! # BNF Grammar
//!
//! ```bnf
//! Expression     ::= Addition
//! Addition       ::= Multiplication ( ( "+" | "-" ) Multiplication )*
//! Multiplication ::= Power ( ( "*" | "/" ) Power )*
//! Power          ::= Unary ( "^" Power )?
//! Unary          ::= ( "+" | "-" )? Primary
//! Primary        ::= Number | Variable | FunctionCall | "(" Expression ")"
//! FunctionCall   ::= ( "log" | "exp" | "pow" ) "(" ArgumentList ")"
//! ArgumentList   ::= Expression ( "," Expression )*
//! Number         ::= [0-9]+ ( "." [0-9]+ )? ( ("e"|"E") ("+"|"-")? [0-9]+ )?
//! Variable       ::= [a-zA-Z_][a-zA-Z0-9_]*
//! ```
//!
//! Precedence and associativity:
//! - `+`/`-` bind loosest, then `*`/`/`, then `^` (right-associative)
//! - Unary sign binds tighter than binary operators
//! - Parentheses override precedence
//!
//! Variables are resolved against the caller-supplied context at evaluation
//! time. The sequential applier injects the running accumulator under the
//! name `current`. Unknown identifiers fail with `InvalidExpression`, which
//! keeps the whole-word matching behavior of variable lookup (a variable `a`
//! never matches inside `cat`) and rejects anything that is not a number,
//! operator, parenthesis or known function.

use crate::error::{EngineError, EngineResult};
use std::collections::HashMap;
use tea_core::Real;

/// Represents a token in the expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Real),
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    LeftParen,
    RightParen,
    Comma,

    Eof,
}

/// Abstract syntax tree node for a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Real),
    Variable(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

/// Binary operators of the restricted grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Unary sign operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// The closed set of callable functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Function {
    /// Natural logarithm, one argument.
    Log,
    /// Natural exponential, one argument.
    Exp,
    /// `pow(base, exponent)`, two arguments.
    Pow,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Function::Log),
            "exp" => Some(Function::Exp),
            "pow" => Some(Function::Pow),
            _ => None,
        }
    }

    fn arity(self) -> usize {
        match self {
            Function::Log | Function::Exp => 1,
            Function::Pow => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Function::Log => "log",
            Function::Exp => "exp",
            Function::Pow => "pow",
        }
    }
}

fn invalid(what: impl Into<String>) -> EngineError {
    EngineError::InvalidExpression { what: what.into() }
}

/// Lexical analyzer for expression strings.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads a number token: integer, decimal, optional exponent part.
    fn read_number(&mut self) -> EngineResult<Real> {
        let mut number_str = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') {
            number_str.push('.');
            self.advance();

            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    number_str.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Exponent part only counts when it is actually followed by digits;
        // otherwise the 'e' belongs to a following identifier.
        if matches!(self.current_char, Some('e') | Some('E')) {
            let next = self.peek();
            let signed_digit = matches!(next, Some('+') | Some('-'))
                && self
                    .input
                    .get(self.position + 2)
                    .is_some_and(|c| c.is_ascii_digit());
            if next.is_some_and(|c| c.is_ascii_digit()) || signed_digit {
                number_str.push('e');
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char {
                    number_str.push(sign);
                    self.advance();
                }
                while let Some(ch) = self.current_char {
                    if ch.is_ascii_digit() {
                        number_str.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        number_str
            .parse::<Real>()
            .map_err(|_| invalid(format!("invalid number: {number_str}")))
    }

    fn read_identifier(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    /// Gets the next token from the input.
    pub fn next_token(&mut self) -> EngineResult<Token> {
        self.skip_whitespace();

        match self.current_char {
            None => Ok(Token::Eof),

            Some(ch) => match ch {
                '0'..='9' => {
                    let number = self.read_number()?;
                    Ok(Token::Number(number))
                }

                'a'..='z' | 'A'..='Z' | '_' => {
                    let identifier = self.read_identifier();
                    Ok(Token::Identifier(identifier))
                }

                '+' => {
                    self.advance();
                    Ok(Token::Plus)
                }

                '-' => {
                    self.advance();
                    Ok(Token::Minus)
                }

                '*' => {
                    self.advance();
                    Ok(Token::Star)
                }

                '/' => {
                    self.advance();
                    Ok(Token::Slash)
                }

                '^' => {
                    self.advance();
                    Ok(Token::Caret)
                }

                '(' => {
                    self.advance();
                    Ok(Token::LeftParen)
                }

                ')' => {
                    self.advance();
                    Ok(Token::RightParen)
                }

                ',' => {
                    self.advance();
                    Ok(Token::Comma)
                }

                _ => Err(invalid(format!("unexpected character: '{ch}'"))),
            },
        }
    }
}

/// Recursive descent parser for the restricted grammar.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(input: &str) -> EngineResult<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;

        Ok(Self {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> EngineResult<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> EngineResult<()> {
        if std::mem::discriminant(&self.current_token) == std::mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(invalid(format!(
                "expected {:?}, found {:?}",
                expected, self.current_token
            )))
        }
    }

    /// Parses the top-level expression.
    pub fn parse(&mut self) -> EngineResult<Expr> {
        if self.current_token == Token::Eof {
            return Err(invalid("empty expression"));
        }

        let expr = self.parse_addition()?;

        if self.current_token != Token::Eof {
            return Err(invalid(format!(
                "unexpected token at end: {:?}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    fn parse_addition(&mut self) -> EngineResult<Expr> {
        let mut left = self.parse_multiplication()?;

        while matches!(self.current_token, Token::Plus | Token::Minus) {
            let op = match self.current_token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_multiplication()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplication(&mut self) -> EngineResult<Expr> {
        let mut left = self.parse_power()?;

        while matches!(self.current_token, Token::Star | Token::Slash) {
            let op = match self.current_token {
                Token::Star => BinaryOp::Multiply,
                Token::Slash => BinaryOp::Divide,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_power()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses power expressions (right-associative).
    fn parse_power(&mut self) -> EngineResult<Expr> {
        let left = self.parse_unary()?;

        if self.current_token == Token::Caret {
            self.advance()?;
            let right = self.parse_power()?;
            Ok(Expr::Binary {
                left: Box::new(left),
                operator: BinaryOp::Power,
                right: Box::new(right),
            })
        } else {
            Ok(left)
        }
    }

    fn parse_unary(&mut self) -> EngineResult<Expr> {
        match self.current_token {
            Token::Plus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Plus,
                    operand: Box::new(operand),
                })
            }
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Minus,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> EngineResult<Expr> {
        match &self.current_token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::Number(value))
            }

            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;

                if self.current_token == Token::LeftParen {
                    let function = Function::from_name(&name)
                        .ok_or_else(|| invalid(format!("unknown function: {name}")))?;
                    self.advance()?;
                    let args = self.parse_argument_list()?;
                    self.expect(Token::RightParen)?;
                    if args.len() != function.arity() {
                        return Err(invalid(format!(
                            "{} takes {} argument(s), got {}",
                            function.name(),
                            function.arity(),
                            args.len()
                        )));
                    }
                    Ok(Expr::Call { function, args })
                } else {
                    Ok(Expr::Variable(name))
                }
            }

            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_addition()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            _ => Err(invalid(format!(
                "unexpected token: {:?}",
                self.current_token
            ))),
        }
    }

    fn parse_argument_list(&mut self) -> EngineResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.current_token == Token::RightParen {
            return Ok(args);
        }

        args.push(self.parse_addition()?);

        while self.current_token == Token::Comma {
            self.advance()?;
            args.push(self.parse_addition()?);
        }

        Ok(args)
    }
}

/// Evaluates a parsed AST against a variable context.
fn eval(expr: &Expr, variables: &HashMap<String, Real>) -> EngineResult<Real> {
    match expr {
        Expr::Number(value) => Ok(*value),

        Expr::Variable(name) => variables
            .get(name)
            .copied()
            .ok_or_else(|| invalid(format!("unknown identifier: {name}"))),

        Expr::Binary {
            left,
            operator,
            right,
        } => {
            let left_val = eval(left, variables)?;
            let right_val = eval(right, variables)?;

            match operator {
                BinaryOp::Add => Ok(left_val + right_val),
                BinaryOp::Subtract => Ok(left_val - right_val),
                BinaryOp::Multiply => Ok(left_val * right_val),
                BinaryOp::Divide => {
                    if right_val == 0.0 {
                        Err(EngineError::DivisionByZero)
                    } else {
                        Ok(left_val / right_val)
                    }
                }
                BinaryOp::Power => Ok(left_val.powf(right_val)),
            }
        }

        Expr::Unary { operator, operand } => {
            let operand_val = eval(operand, variables)?;

            match operator {
                UnaryOp::Plus => Ok(operand_val),
                UnaryOp::Minus => Ok(-operand_val),
            }
        }

        Expr::Call { function, args } => match function {
            Function::Log => {
                let arg = eval(&args[0], variables)?;
                if arg <= 0.0 {
                    Err(EngineError::NonPositiveLogarithm)
                } else {
                    Ok(arg.ln())
                }
            }
            Function::Exp => {
                let arg = eval(&args[0], variables)?;
                Ok(arg.exp())
            }
            Function::Pow => {
                let base = eval(&args[0], variables)?;
                let exponent = eval(&args[1], variables)?;
                Ok(base.powf(exponent))
            }
        },
    }
}

/// Evaluates an expression string against named numeric variables.
///
/// Pure function of its inputs: parses the restricted grammar, resolves
/// identifiers from `variables` and walks the AST. The result must be finite
/// or the call fails with `InvalidExpression`.
pub fn evaluate_expression(
    expression: &str,
    variables: &HashMap<String, Real>,
) -> EngineResult<Real> {
    let ast = Parser::new(expression)?.parse()?;
    let value = eval(&ast, variables)?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid("expression did not produce a finite number"))
    }
}
