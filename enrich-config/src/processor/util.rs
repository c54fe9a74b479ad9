use enrich_core::err::{bail, Context, Result};
use serde_yaml::{Mapping, Value};

/// Recursively walks the configuration nodes using the supplied callback
/// to transform any strings found.
///
/// Errors name the path of the failing value, never the value itself, as
/// config strings may hold credentials.
pub(crate) fn process_strings(
    node: Value,
    cb: &impl Fn(String) -> Result<String>,
) -> Result<Value> {
    process_node(node, "", cb)
}

fn process_node(node: Value, path: &str, cb: &impl Fn(String) -> Result<String>) -> Result<Value> {
    Ok(match node {
        Value::String(str) => Value::String(cb(str).with_context(|| {
            format!(
                "Failed to process config value at {}",
                if path.is_empty() { "<root>" } else { path }
            )
        })?),
        Value::Sequence(seq) => Value::Sequence(
            seq.into_iter()
                .enumerate()
                .map(|(idx, n)| process_node(n, &format!("{}[{}]", path, idx), cb))
                .collect::<Result<Vec<Value>>>()?,
        ),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| -> Result<(Value, Value)> {
                    let key = match &k {
                        Value::String(key) => key.clone(),
                        other => format!("{:?}", other),
                    };
                    let path = if path.is_empty() {
                        key
                    } else {
                        format!("{}.{}", path, key)
                    };

                    Ok((k, process_node(v, &path, cb)?))
                })
                .collect::<Result<Mapping>>()?,
        ),
        n => n,
    })
}

/// Replaces `${part1:part2:...}` interpolations in the supplied string.
///
/// The callback receives the `:` separated parts and returns `None` to leave the
/// interpolation untouched. `\$` produces a literal `$`.
pub(crate) fn interpolate(
    str: &str,
    cb: &impl Fn(&[String]) -> Result<Option<String>>,
) -> Result<String> {
    let mut out = String::with_capacity(str.len());
    let mut chars = str.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, '$'))) => {
                chars.next();
                out.push('$');
            }
            '$' if matches!(chars.peek(), Some((_, '{'))) => {
                let start = idx + 2;
                let Some(len) = str[start..].find('}') else {
                    bail!("Failed to parse ${{...}} expression at offset {}, no closing bracket", idx);
                };
                let expr = &str[start..start + len];
                let parts = expr.split(':').map(|p| p.to_string()).collect::<Vec<_>>();

                match cb(&parts)? {
                    Some(val) => out.push_str(&val),
                    None => out.push_str(&str[idx..start + len + 1]),
                }

                // skip past the closing bracket
                while let Some((i, _)) = chars.peek() {
                    if *i > start + len {
                        break;
                    }
                    chars.next();
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
