use enrich_core::err::{bail, Result};
use itertools::Itertools;
use serde::Serialize;

/// A lookup statement compiled from named to positional placeholders
///
/// `SELECT * FROM country WHERE code = :code` compiles to
/// `SELECT * FROM country WHERE code = ?` with the parameter list `["code"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupQuery {
    /// The statement as configured
    statement: String,
    /// The statement with positional placeholders
    sql: String,
    /// Placeholder names in the order they appear, may contain duplicates
    params: Vec<String>,
}

impl LookupQuery {
    /// Compiles the supplied statement.
    ///
    /// Placeholders inside quoted text and comments are left untouched,
    /// as is the `::` cast operator.
    pub fn parse(statement: &str) -> Result<Self> {
        #[derive(Debug, Clone, Copy, PartialEq)]
        enum State {
            Sql,
            Quoted(char),
            LineComment,
            BlockComment,
        }

        let chars = statement.chars().collect::<Vec<char>>();
        let mut sql = String::with_capacity(statement.len());
        let mut params = vec![];
        let mut state = State::Sql;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match (state, c) {
                (State::Sql, '\'' | '"' | '`') => {
                    state = State::Quoted(c);
                    sql.push(c);
                }
                (State::Sql, '-') if next == Some('-') => {
                    state = State::LineComment;
                    sql.push_str("--");
                    i += 1;
                }
                (State::Sql, '#') => {
                    state = State::LineComment;
                    sql.push(c);
                }
                (State::Sql, '/') if next == Some('*') => {
                    state = State::BlockComment;
                    sql.push_str("/*");
                    i += 1;
                }
                (State::Sql, ':') if next == Some(':') => {
                    sql.push_str("::");
                    i += 1;
                }
                (State::Sql, ':') if next.map_or(false, is_ident_start) => {
                    let start = i + 1;
                    let end = chars[start..]
                        .iter()
                        .position(|c| !is_ident_char(*c))
                        .map_or(chars.len(), |len| start + len);

                    params.push(chars[start..end].iter().collect::<String>());
                    sql.push('?');
                    i = end;
                    continue;
                }
                (State::Sql, '?') => bail!(
                    "Positional '?' placeholders are not supported, use named placeholders such as ':id' (at offset {})",
                    i
                ),
                // backslash escapes apply to string literals, not `identifiers`
                (State::Quoted('\'' | '"'), '\\') => {
                    sql.push(c);
                    if let Some(escaped) = next {
                        sql.push(escaped);
                        i += 1;
                    }
                }
                (State::Quoted(quote), c) if c == quote => {
                    state = State::Sql;
                    sql.push(c);
                }
                (State::LineComment, '\n') => {
                    state = State::Sql;
                    sql.push(c);
                }
                (State::BlockComment, '*') if next == Some('/') => {
                    state = State::Sql;
                    sql.push_str("*/");
                    i += 1;
                }
                _ => sql.push(c),
            }

            i += 1;
        }

        match state {
            State::Quoted(quote) => bail!("Unterminated {} quote in statement", quote),
            State::BlockComment => bail!("Unterminated block comment in statement"),
            _ => {}
        }

        Ok(Self {
            statement: statement.to_string(),
            sql,
            params,
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The placeholder names in positional order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The distinct placeholder names, in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.as_str()).unique().collect()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
