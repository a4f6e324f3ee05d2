//! Pretty-printed JSON array export.

use crate::collect::Item;
use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `items` as a JSON array indented with four spaces.
pub fn write(path: &Path, items: &[Item]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    items.serialize(&mut serializer)?;

    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_set;
    use assert_json_diff::assert_json_include;
    use serde_json::{json, Value};

    #[test]
    fn test_writes_full_record_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let set = sample_set(2);
        write(&path, set.items()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {"));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_json_include!(
            actual: value,
            expected: json!([
                {
                    "title": "Video 0",
                    "views": "0K views",
                    "age": "0 days ago",
                    "id": "ID0",
                    "toggle": "ON"
                },
                { "title": "Video 1", "id": "ID1" }
            ])
        );
    }

    #[test]
    fn test_non_ascii_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut set = crate::collect::CollectedSet::new();
        set.ingest(vec![crate::collect::RawItem {
            title: "日本語タイトル".into(),
            link: "/watch?v=JP".into(),
            ..Default::default()
        }]);
        write(&path, set.items()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("日本語タイトル"));
    }
}
