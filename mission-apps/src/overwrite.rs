//! Command-line edits of a mission config document.

use anyhow::{bail, Context, Result};
use toml::Value;
use toml_query::{delete::TomlValueDeleteExt, insert::TomlValueInsertExt, read::TomlValueReadExt};
use tracing::debug;

const SEPARATORS: &[char] = &['\n', ';'];

/// Edits the TOML document with the given scripts.
///
/// Multiple scripts can be given at once, separated by newlines or
/// semicolons. Empty scripts are ignored.
///
/// - `<key> = <value>` sets the key, creating it (and any intermediate
///   tables) if missing. An array index past the end appends.
/// - `<key> =` deletes the key or array element if it exists.
///
/// ```
/// let mut doc: toml::Value = toml::from_str("poll_interval_ms = 100").unwrap();
/// mission_apps::overwrite::overwrite(&mut doc, "poll_interval_ms = 20; frame_id = \"odom\"")
///     .unwrap();
/// assert_eq!(doc["poll_interval_ms"].as_integer(), Some(20));
/// assert_eq!(doc["frame_id"].as_str(), Some("odom"));
/// ```
pub fn overwrite(doc: &mut Value, scripts: &str) -> Result<()> {
    for script in parse_scripts(scripts)? {
        let query = &script.query;
        match script.operation {
            Operation::Set(value) => {
                debug!(?query, ?value, "executing insert operation");
                doc.insert(query, value)?;
            }
            Operation::Delete => {
                let Some(old) = doc.read_mut(query)? else {
                    debug!(?query, "nothing to delete");
                    continue;
                };
                // toml-query refuses to delete non-empty tables and arrays.
                if old.is_array() {
                    *old = Value::Array(vec![]);
                } else if old.is_table() {
                    *old = Value::Table(Default::default());
                }
                debug!(?query, "executing delete operation");
                doc.delete(query)?;
            }
        }
    }
    Ok(())
}

/// Same as [`overwrite`], working on the document text.
pub fn overwrite_str(doc: &str, scripts: &str) -> Result<String> {
    let mut doc: Value = toml::from_str(doc)?;
    overwrite(&mut doc, scripts)?;
    Ok(toml::to_string(&doc)?)
}

#[derive(Debug, PartialEq)]
struct Script {
    query: String,
    operation: Operation,
}

#[derive(Debug, PartialEq)]
enum Operation {
    Set(Value),
    Delete,
}

fn parse_scripts(s: &str) -> Result<Vec<Script>> {
    let mut scripts = vec![];
    for raw in split_outside_quotes(s)? {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let (query, value) = split_assignment(raw)
            .with_context(|| format!("expected `<key> = <value>`, found `{raw}`"))?;
        let query = query.trim();
        if query.is_empty() {
            bail!("empty key in `{raw}`");
        }
        let value = value.trim();
        let operation = if value.is_empty() {
            Operation::Delete
        } else {
            Operation::Set(parse_value(value)?)
        };
        scripts.push(Script {
            query: query.to_owned(),
            operation,
        });
    }
    Ok(scripts)
}

fn parse_value(s: &str) -> Result<Value> {
    let mut table: Value = toml::from_str(&format!("v = {s}"))
        .with_context(|| format!("invalid TOML value `{s}`"))?;
    table
        .as_table_mut()
        .and_then(|t| t.remove("v"))
        .with_context(|| format!("invalid TOML value `{s}`"))
}

/// Splits at the first `=` that is not inside a quoted key.
fn split_assignment(s: &str) -> Option<(&str, &str)> {
    let mut quote = None;
    for (i, ch) in s.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(q), _) if q == ch => quote = None,
            (None, '=') => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

fn split_outside_quotes(s: &str) -> Result<Vec<&str>> {
    let mut parts = vec![];
    let mut start = 0;
    let mut quote = None;
    let mut escaped = false;
    for (i, ch) in s.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' && q == '"' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if SEPARATORS.contains(&ch) => {
                parts.push(&s[start..i]);
                start = i + ch.len_utf8();
            }
            None => {}
        }
    }
    if let Some(q) = quote {
        bail!("unterminated string literal (missing `{q}`) in `{s}`");
    }
    parts.push(&s[start..]);
    Ok(parts)
}
