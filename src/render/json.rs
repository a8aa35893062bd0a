//! JSON rendering for outline and analysis reports.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any report to a JSON string. Non-ASCII text is written as-is.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let bytes = to_json_bytes(value, format)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("invalid UTF-8 output: {}", e)))
}

fn to_json_bytes<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let result = match format {
        JsonFormat::Pretty => {
            let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
            value.serialize(&mut ser)
        }
        JsonFormat::Compact => value.serialize(&mut Serializer::new(&mut out)),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    Ok(out)
}

/// Serialize `value` and write it to `path`, creating parent directories.
///
/// The file is written in one call after serialization succeeds.
pub fn write_json<T, P>(value: &T, path: P, format: JsonFormat) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = to_json_bytes(value, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry, OutlineResult};

    fn sample() -> OutlineResult {
        OutlineResult {
            title: "Café Guide".to_string(),
            outline: vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Menu".to_string(),
                page: 1,
            }],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        let expected = "{\n    \"title\": \"Café Guide\",\n    \"outline\": [\n        {\n            \"level\": \"H1\",\n            \"text\": \"Menu\",\n            \"page\": 1\n        }\n    ]\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Café Guide","outline":[{"level":"H1","text":"Menu","page":1}]}"#
        );
    }

    #[test]
    fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_json(&sample(), &path, JsonFormat::Pretty).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: OutlineResult = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, sample());
    }
}
