//! Statement source: reading a statement file and splitting it into commands

use std::path::Path;

use execql_core::{ExecqlError, Result};

/// Read a statement file and split it into individual statements
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_statements(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    tracing::info!("reading statement file");

    let text = std::fs::read_to_string(path).map_err(|e| {
        ExecqlError::Io(std::io::Error::new(
            e.kind(),
            format!("read statement file error: {}: {}", path.display(), e),
        ))
    })?;

    let statements = split_statements(&text);
    tracing::info!(statements = statements.len(), "statement file read");
    Ok(statements)
}

#[derive(Clone, PartialEq, Eq)]
enum Scan {
    Code,
    Quoted(char),
    /// Inside `$tag$ ... $tag$`; holds the full delimiter
    DollarQuoted(String),
    LineComment,
    BlockComment,
}

/// Split a multi-statement string on `;`.
///
/// Semicolons inside quoted literals (`'...'`, `"..."`, doubled quotes
/// escape), dollar-quoted bodies (`$$ ... $$`, `$body$ ... $body$`), `--`
/// line comments and `/* */` block comments do not split. Pieces are
/// trimmed and empty pieces are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let chars: Vec<char> = sql.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = Scan::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match &state {
            Scan::Code => match c {
                ';' => {
                    push_trimmed(&mut statements, &current);
                    current.clear();
                    i += 1;
                    continue;
                }
                '\'' | '"' => state = Scan::Quoted(c),
                '-' if next == Some('-') => state = Scan::LineComment,
                '/' if next == Some('*') => {
                    current.push_str("/*");
                    i += 2;
                    state = Scan::BlockComment;
                    continue;
                }
                '$' if i == 0 || !is_ident_char(chars[i - 1]) => {
                    if let Some(tag) = dollar_tag(&chars[i..]) {
                        current.push_str(&tag);
                        i += tag.chars().count();
                        state = Scan::DollarQuoted(tag);
                        continue;
                    }
                }
                _ => {}
            },
            Scan::Quoted(quote) if c == *quote => {
                if next == Some(c) {
                    current.push(c);
                    current.push(c);
                    i += 2;
                    continue;
                }
                state = Scan::Code;
            }
            Scan::DollarQuoted(tag) if c == '$' && starts_with(&chars[i..], tag) => {
                current.push_str(tag);
                i += tag.chars().count();
                state = Scan::Code;
                continue;
            }
            Scan::LineComment if c == '\n' => state = Scan::Code,
            Scan::BlockComment if c == '*' && next == Some('/') => {
                current.push_str("*/");
                i += 2;
                state = Scan::Code;
                continue;
            }
            _ => {}
        }
        current.push(c);
        i += 1;
    }

    push_trimmed(&mut statements, &current);
    statements
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The opening delimiter at the start of `rest`, if it is one.
///
/// `$1` style parameters are not delimiters: a tag cannot start with a digit.
fn dollar_tag(rest: &[char]) -> Option<String> {
    let close = rest.iter().skip(1).position(|&c| !is_ident_char(c))? + 1;
    if rest[close] != '$' || rest.get(1).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(rest[..=close].iter().collect())
}

fn starts_with(rest: &[char], tag: &str) -> bool {
    let mut rest = rest.iter();
    tag.chars().all(|t| rest.next() == Some(&t))
}

fn push_trimmed(statements: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
