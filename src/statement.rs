//! Guard applied to generated SQL before it reaches the engine
//!
//! Statements are tokenized with the SQLite dialect rather than matched on a
//! string prefix. Only one statement of an allowed kind is accepted, and for
//! data statements every single-quoted literal is lifted out into a bound
//! parameter.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::fmt;
use thiserror::Error;

/// Statement kinds the executor will run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
}

impl StatementKind {
    fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::SELECT => Some(StatementKind::Select),
            Keyword::INSERT => Some(StatementKind::Insert),
            Keyword::UPDATE => Some(StatementKind::Update),
            Keyword::DELETE => Some(StatementKind::Delete),
            Keyword::CREATE => Some(StatementKind::Create),
            _ => None,
        }
    }

    /// Reads return rows; everything else is committed
    pub fn is_read(self) -> bool {
        self == StatementKind::Select
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Create => "CREATE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("statement is empty")]
    Empty,

    #[error("could not tokenize statement: {0}")]
    Tokenize(String),

    #[error("{0} statements are not allowed (permitted: SELECT, INSERT, UPDATE, DELETE, CREATE)")]
    NotAllowed(String),

    #[error("only one statement can be executed at a time")]
    MultipleStatements,
}

/// A statement ready for execution with its lifted literal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<String>,
}

fn tokenize(sql: &str) -> Result<Vec<Token>, StatementError> {
    let dialect = SQLiteDialect {};
    Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| StatementError::Tokenize(e.to_string()))
}

// Whitespace tokens also carry comments
fn is_trivia(token: &Token) -> bool {
    matches!(token, Token::Whitespace(_) | Token::EOF)
}

fn ensure_single_statement(tokens: &[Token]) -> Result<(), StatementError> {
    let mut terminated = false;
    for token in tokens.iter().filter(|t| !is_trivia(t)) {
        match token {
            Token::SemiColon => terminated = true,
            _ if terminated => return Err(StatementError::MultipleStatements),
            _ => {}
        }
    }
    Ok(())
}

fn classify_tokens(tokens: &[Token]) -> Result<StatementKind, StatementError> {
    let first = tokens
        .iter()
        .find(|t| !is_trivia(t) && **t != Token::SemiColon)
        .ok_or(StatementError::Empty)?;

    ensure_single_statement(tokens)?;

    match first {
        Token::Word(word) => StatementKind::from_keyword(word.keyword)
            .ok_or_else(|| StatementError::NotAllowed(word.value.to_uppercase())),
        other => Err(StatementError::NotAllowed(other.to_string())),
    }
}

/// Where the next token sits. SQLite reads a single-quoted token as an
/// identifier in name positions, so only tokens in `Expression` are literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Expression,
    /// After AS, FROM, UPDATE or JOIN
    Name,
    /// After INTO
    InsertTarget,
    AfterInsertTarget,
    /// Inside `INSERT INTO t (...)`, with paren depth
    ColumnList(usize),
}

impl Slot {
    fn takes_name(self) -> bool {
        matches!(
            self,
            Slot::Name | Slot::InsertTarget | Slot::ColumnList(_)
        )
    }

    /// Slot of the token following `token`
    fn advance(self, token: &Token) -> Slot {
        match (self, token) {
            (Slot::ColumnList(depth), Token::LParen) => Slot::ColumnList(depth + 1),
            (Slot::ColumnList(1), Token::RParen) => Slot::Expression,
            (Slot::ColumnList(depth), Token::RParen) => Slot::ColumnList(depth - 1),
            (Slot::ColumnList(depth), _) => Slot::ColumnList(depth),
            (Slot::InsertTarget, _) => Slot::AfterInsertTarget,
            (Slot::AfterInsertTarget, Token::LParen) => Slot::ColumnList(1),
            (_, Token::Word(word)) => match word.keyword {
                Keyword::INTO => Slot::InsertTarget,
                Keyword::AS | Keyword::FROM | Keyword::UPDATE | Keyword::JOIN => Slot::Name,
                _ => Slot::Expression,
            },
            _ => Slot::Expression,
        }
    }
}

/// Determine the kind of a single SQL statement from its leading keyword
pub fn classify(sql: &str) -> Result<StatementKind, StatementError> {
    classify_tokens(&tokenize(sql)?)
}

/// Classify a statement and lift its string literals into parameters.
///
/// `CREATE` statements are returned verbatim since SQLite does not accept
/// parameters in DDL.
pub fn prepare(sql: &str) -> Result<BoundStatement, StatementError> {
    let tokens = tokenize(sql)?;
    let kind = classify_tokens(&tokens)?;

    if kind == StatementKind::Create {
        return Ok(BoundStatement {
            kind,
            sql: sql.trim().to_string(),
            params: Vec::new(),
        });
    }

    let mut params = Vec::new();
    let mut rewritten = String::with_capacity(sql.len());
    let mut slot = Slot::Expression;
    for token in tokens {
        let next_slot = if is_trivia(&token) {
            slot
        } else {
            slot.advance(&token)
        };
        match token {
            Token::SingleQuotedString(value) if !slot.takes_name() => {
                params.push(value);
                rewritten.push('?');
            }
            other => rewritten.push_str(&other.to_string()),
        }
        slot = next_slot;
    }

    Ok(BoundStatement {
        kind,
        sql: rewritten.trim().to_string(),
        params,
    })
}
