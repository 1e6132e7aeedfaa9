//! Table query filter expressions.
//!
//! Filters arrive as text in the table-storage query syntax, e.g.
//! `RowKey eq 'U1' and MessageId eq 'M1'`. They are parsed into a [`Filter`] tree and then
//! rendered as a SurrealQL `WHERE` clause whose values are all bound parameters.

use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::anyhow;
use serde::Serialize;

use crate::base::types::Res;

/// Builds the filter matching a recipient's sent notification by delivering message id.
pub fn reaction_filter(user_id: &str, message_id: &str) -> String {
    format!("RowKey eq {} and MessageId eq {}", quote(user_id), quote(message_id))
}

/// Quotes a string literal, doubling any embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// Types.

/// A literal value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }

    fn as_surql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Compare { property: String, op: ComparisonOp, value: Literal },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Renders the filter as a SurrealQL condition.
    ///
    /// Every literal is added to `params` under a generated name (`f0`, `f1`, ...) and referenced
    /// as `$fN` in the returned text.
    pub fn to_surql(&self, params: &mut BTreeMap<String, Literal>) -> String {
        match self {
            Filter::Compare { property, op, value } => {
                let name = format!("f{}", params.len());
                params.insert(name.clone(), value.clone());
                format!("`{}` {} ${}", property, op.as_surql(), name)
            }
            Filter::And(left, right) => format!("({} AND {})", left.to_surql(params), right.to_surql(params)),
            Filter::Or(left, right) => format!("({} OR {})", left.to_surql(params), right.to_surql(params)),
            Filter::Not(inner) => format!("!({})", inner.to_surql(params)),
        }
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Res<Self> {
        let tokens = tokenize(s)?;
        let mut parser = Parser { tokens, position: 0 };

        let filter = parser.parse_or()?;

        if let Some(token) = parser.peek() {
            return Err(anyhow!("Unexpected `{}` in filter `{}`.", token, s));
        }

        Ok(filter)
    }
}

// Tokenizer.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Str(String),
    Int(i64),
    Open,
    Close,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{w}"),
            Token::Str(s) => write!(f, "{}", quote(s)),
            Token::Int(i) => write!(f, "{i}"),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Res<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '\'' => {
                chars.next();
                let mut value = String::new();

                loop {
                    match chars.next() {
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            value.push('\'');
                        }
                        Some('\'') => break,
                        Some(c) => value.push(c),
                        None => return Err(anyhow!("Unterminated string literal in filter `{}`.", input)),
                    }
                }

                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut number = String::new();

                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || (number.is_empty() && c == '-') {
                        number.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let value = number.parse().map_err(|_| anyhow!("Invalid number `{}` in filter `{}`.", number, input))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();

                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }

                tokens.push(Token::Word(word));
            }
            other => return Err(anyhow!("Unexpected character `{}` in filter `{}`.", other, input)),
        }
    }

    Ok(tokens)
}

// Parser.

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn next_is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn parse_or(&mut self) -> Res<Filter> {
        let mut left = self.parse_and()?;

        while self.next_is_keyword("or") {
            self.next();
            let right = self.parse_and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Res<Filter> {
        let mut left = self.parse_unary()?;

        while self.next_is_keyword("and") {
            self.next();
            let right = self.parse_unary()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Res<Filter> {
        if self.next_is_keyword("not") {
            self.next();
            return Ok(Filter::Not(Box::new(self.parse_unary()?)));
        }

        if self.peek() == Some(&Token::Open) {
            self.next();
            let inner = self.parse_or()?;

            return match self.next() {
                Some(Token::Close) => Ok(inner),
                _ => Err(anyhow!("Expected `)` in filter.")),
            };
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Res<Filter> {
        let property = match self.next() {
            Some(Token::Word(w)) => w,
            Some(other) => return Err(anyhow!("Expected a property name, found `{}`.", other)),
            None => return Err(anyhow!("Expected a property name, found end of filter.")),
        };

        let op = match self.next() {
            Some(Token::Word(w)) => ComparisonOp::from_keyword(&w).ok_or_else(|| anyhow!("Unknown comparison operator `{}`.", w))?,
            Some(other) => return Err(anyhow!("Expected a comparison operator, found `{}`.", other)),
            None => return Err(anyhow!("Expected a comparison operator after `{}`.", property)),
        };

        let value = match self.next() {
            Some(Token::Str(s)) => Literal::String(s),
            Some(Token::Int(i)) => Literal::Int(i),
            Some(Token::Word(w)) if w == "true" => Literal::Bool(true),
            Some(Token::Word(w)) if w == "false" => Literal::Bool(false),
            Some(other) => return Err(anyhow!("Expected a literal value, found `{}`.", other)),
            None => return Err(anyhow!("Expected a literal value after `{}`.", property)),
        };

        Ok(Filter::Compare { property, op, value })
    }
}
