use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::record::{DEFAULT_CATEGORY, DocumentRecord};

/// Returns the text between the opening and closing `---` lines, or `None`
/// when the content does not start with a complete header block.
pub fn split_frontmatter(content: &str) -> Option<&str> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" || !first.ends_with('\n') {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Builds a record from the header block of `content`.
///
/// The block is read as YAML first. A block that is not a valid YAML mapping
/// goes through the line-oriented reader instead, which never fails: bad list
/// syntax only leaves that list empty. Values YAML would retype (numbers,
/// booleans, nulls) keep the text written in the header.
pub fn extract_frontmatter(path: &Path, content: &str) -> Option<DocumentRecord> {
    let block = split_frontmatter(content)?;
    let record = match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(map)) => record_from_mapping(path, &map, block),
        Ok(Value::Null) => DocumentRecord::new(path),
        Ok(_) => parse_header_lines(path, block),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "header is not valid yaml; using line reader");
            parse_header_lines(path, block)
        }
    };
    Some(record)
}

fn record_from_mapping(path: &Path, map: &serde_yaml::Mapping, block: &str) -> DocumentRecord {
    let written = parse_header_lines(path, block);
    let mut rec = DocumentRecord::new(path);
    let get = |key: &str| map.get(Value::String(key.into()));

    if let Some(title) = get("title").and_then(|v| scalar_text(v, &written.title)) {
        rec.title = title;
    }
    if let Some(category) = get("category").and_then(|v| scalar_text(v, &written.category)) {
        if !category.is_empty() {
            rec.category = category;
        }
    }
    let written_difficulty = written.difficulty.as_deref().unwrap_or_default();
    rec.difficulty = get("difficulty")
        .and_then(|v| scalar_text(v, written_difficulty))
        .filter(|d| !d.is_empty());
    rec.tags = list_text(get("tags"), &written.tags);
    rec.related = list_text(get("related"), &written.related);
    rec.language = list_text(get("language"), &written.language);
    rec
}

/// YAML strings as parsed; other scalars as `written` in the header.
fn scalar_text(v: &Value, written: &str) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(_) | Value::Bool(_) | Value::Null => Some(written.to_string()),
        Value::Tagged(t) => scalar_text(&t.value, written),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Sequences of YAML strings and comma-separated strings are read from the
/// parsed value. Anything holding a retyped scalar uses the `written` list.
fn list_text(v: Option<&Value>, written: &[String]) -> Vec<String> {
    match v {
        None | Some(Value::Mapping(_)) => Vec::new(),
        Some(Value::Sequence(seq)) if seq.iter().all(Value::is_string) => seq
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => split_inline_list(s),
        Some(Value::Tagged(t)) => list_text(Some(&t.value), written),
        Some(_) => written.to_vec(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKey {
    Tags,
    Related,
    Language,
}

/// Line-oriented header reader.
///
/// `key: value` lines flush against the left margin start a new field. The
/// list keys (`tags`, `related`, `language`) take an inline `[a, b]` value or
/// open a list that following `- item` lines append to. Everything else is
/// ignored.
pub(crate) fn parse_header_lines(path: &Path, block: &str) -> DocumentRecord {
    let mut rec = DocumentRecord::new(path);
    let mut current: Option<ListKey> = None;

    for raw in block.lines() {
        let line = raw.trim_end();

        if let Some((key, value)) = split_key_line(line) {
            let value = strip_quotes(value.trim());
            current = None;
            match key {
                "title" => rec.title = value.to_string(),
                "category" if !value.is_empty() => rec.category = value.to_string(),
                "category" => rec.category = DEFAULT_CATEGORY.to_string(),
                "difficulty" => {
                    rec.difficulty = (!value.is_empty()).then(|| value.to_string());
                }
                "tags" | "related" | "language" => {
                    let list_key = match key {
                        "tags" => ListKey::Tags,
                        "related" => ListKey::Related,
                        _ => ListKey::Language,
                    };
                    let list = list_mut(&mut rec, list_key);
                    if is_bracketed(value) {
                        *list = split_inline_list(value);
                    } else {
                        list.clear();
                        current = Some(list_key);
                    }
                }
                _ => {}
            }
            continue;
        }

        let Some(key) = current else {
            continue;
        };
        if let Some(item) = line.trim_start().strip_prefix('-') {
            let item = strip_quotes(item.trim()).trim();
            if !item.is_empty() {
                list_mut(&mut rec, key).push(item.to_string());
            }
        }
    }

    rec
}

fn split_key_line(line: &str) -> Option<(&str, &str)> {
    let first = line.chars().next()?;
    if first.is_whitespace() || first == '-' || first == '#' {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value))
}

fn list_mut(rec: &mut DocumentRecord, key: ListKey) -> &mut Vec<String> {
    match key {
        ListKey::Tags => &mut rec.tags,
        ListKey::Related => &mut rec.related,
        ListKey::Language => &mut rec.language,
    }
}

fn is_bracketed(value: &str) -> bool {
    value.starts_with('[') && value.ends_with(']')
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"').trim_matches('\'')
}

/// Splits `[a, "b", c]` (brackets optional) into trimmed, unquoted items.
fn split_inline_list(value: &str) -> Vec<String> {
    let inner = value.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .split(',')
        .map(|item| strip_quotes(item.trim()).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
