//! Typed JSON decoding.
//!
//! Decoding is structural: unknown fields are ignored and missing fields take
//! their type's default (the model types carry `#[serde(default)]`). When
//! decoding fails because of a type mismatch, the failing field's JSON path
//! is recovered from the error position so the caller can see which field
//! was wrong (for example `exif.exif.ISO`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};


/// Failure to decode a JSON document into a typed value.
#[derive(Debug)]
pub struct DecodeError {
    /// Dotted path of the offending field, when it could be located
    pub path: Option<String>,
    /// The underlying serde_json error
    pub source: serde_json::Error,
}

/// Decodes `bytes` into `T`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| {
        let path = if source.is_data() {
            locate(bytes, source.line(), source.column())
        } else {
            None
        };
        DecodeError { path, source }
    })
}

/// Deserializes `null` as the type's default value.
///
/// The service sends `null` for absent nested records in some responses;
/// those must decode exactly like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

enum Frame {
    Object(Option<String>),
    Array(usize),
}

/// Reconstructs the JSON path of the value at `line`/`column` (1-based, as
/// reported by serde_json) by scanning the document prefix.
fn locate(bytes: &[u8], line: usize, column: usize) -> Option<String> {
    let end = offset_of(bytes, line, column)?;

    let mut stack: Vec<Frame> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut current = Vec::new();
    let mut last_string: Option<String> = None;

    for &b in &bytes[..end] {
        if in_string {
            if escaped {
                escaped = false;
                current.push(b);
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
                last_string = Some(String::from_utf8_lossy(&current).into_owned());
            } else {
                current.push(b);
            }
            continue;
        }

        match b {
            b'"' => {
                in_string = true;
                current.clear();
            }
            b'{' => stack.push(Frame::Object(None)),
            b'[' => stack.push(Frame::Array(0)),
            b'}' | b']' => {
                stack.pop();
            }
            b':' => {
                if let Some(Frame::Object(key)) = stack.last_mut() {
                    *key = last_string.take();
                }
            }
            b',' => match stack.last_mut() {
                Some(Frame::Array(index)) => *index += 1,
                Some(Frame::Object(key)) => *key = None,
                None => {}
            },
            _ => {}
        }
    }

    let segments: Vec<String> = stack
        .iter()
        .filter_map(|frame| match frame {
            Frame::Object(key) => key.clone(),
            Frame::Array(index) => Some(index.to_string()),
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Converts a 1-based line/column position into a byte offset.
fn offset_of(bytes: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut line_start = 0;
    for _ in 1..line {
        let newline = bytes[line_start..].iter().position(|&b| b == b'\n')?;
        line_start += newline + 1;
    }
    Some((line_start + column).min(bytes.len()))
}
