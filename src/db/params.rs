//! `:name` placeholders → driver positional placeholders.
//!
//! Values are never spliced into the statement text; the rewrite only
//! decides which bound value goes to which position.

use crate::error::EngineError;
use crate::models::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (PostgreSQL). Repeated names reuse their index.
    Dollar,
    /// `?` (MySQL). Every occurrence gets its own slot.
    Question,
}

/// A statement ready for binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    /// Parameter name of each position.
    pub names: Vec<String>,
    /// Values in positional order.
    pub values: Vec<serde_json::Value>,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// `E'...'` strings honour backslash escapes in PostgreSQL.
fn is_escape_string_prefix(chars: &[char], quote: usize) -> bool {
    match quote.checked_sub(1).map(|p| chars[p]) {
        Some('E' | 'e') => quote < 2 || !is_ident_char(chars[quote - 2]),
        _ => false,
    }
}

/// End (exclusive) of a `$tag$ ... $tag$` body starting at `start`, if one
/// starts there. An unterminated body runs to the end of the text.
fn dollar_quote_end(chars: &[char], start: usize) -> Option<usize> {
    if start > 0 && (is_ident_char(chars[start - 1]) || chars[start - 1] == '$') {
        return None;
    }
    let mut j = start + 1;
    if chars.get(j).copied().is_some_and(is_ident_start) {
        while j < chars.len() && is_ident_char(chars[j]) {
            j += 1;
        }
    }
    if chars.get(j) != Some(&'$') {
        return None;
    }
    let tag = &chars[start..=j];
    let mut k = j + 1;
    while k + tag.len() <= chars.len() {
        if &chars[k..k + tag.len()] == tag {
            return Some(k + tag.len());
        }
        k += 1;
    }
    Some(chars.len())
}

/// Rewrite `sql` for `style`, pulling each placeholder's value from `params`.
pub fn rewrite(
    sql: &str,
    params: &QueryParams,
    style: PlaceholderStyle,
) -> Result<BoundStatement, EngineError> {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<String> = Vec::new();
    let mut values = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' | '`' => {
                // Quoted text runs to the closing quote; doubled quotes escape.
                let backslashes = match (style, c) {
                    (PlaceholderStyle::Question, '\'' | '"') => true,
                    (PlaceholderStyle::Dollar, '\'') => is_escape_string_prefix(&chars, i),
                    _ => false,
                };
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if backslashes && chars[i] == '\\' {
                        if let Some(&next) = chars.get(i + 1) {
                            out.push(next);
                        }
                        i += 2;
                        continue;
                    }
                    if chars[i] == c {
                        if chars.get(i + 1) == Some(&c) {
                            out.push(c);
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            '$' if style == PlaceholderStyle::Dollar => match dollar_quote_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..end]);
                    i = end;
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            },
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                out.push_str("/*");
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        out.push_str("*/");
                        i += 2;
                        break;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '\\' if chars.get(i + 1) == Some(&':') => {
                out.push(':');
                i += 2;
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                out.push_str("::");
                i += 2;
            }
            ':' if chars.get(i + 1).copied().is_some_and(is_ident_start) => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_ident_char(chars[end]) {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                let value = params
                    .get(&name)
                    .ok_or_else(|| EngineError::MissingParameter(name.clone()))?;
                match style {
                    PlaceholderStyle::Dollar => {
                        let index = match names.iter().position(|n| *n == name) {
                            Some(pos) => pos + 1,
                            None => {
                                names.push(name);
                                values.push(value.clone());
                                names.len()
                            }
                        };
                        out.push('$');
                        out.push_str(&index.to_string());
                    }
                    PlaceholderStyle::Question => {
                        names.push(name);
                        values.push(value.clone());
                        out.push('?');
                    }
                }
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(BoundStatement {
        sql: out,
        names,
        values,
    })
}
