//! Definition loading for actionbook
//!
//! Walks a directory tree, parses every `.json` and `.toml` file into a
//! top-level `name -> definition` mapping and merges them all into one flat
//! [`ActionTable`]. A file that fails to parse is logged and skipped; a name
//! declared twice anywhere is fatal, because the table addresses actions by
//! name alone.

pub mod errors;

use std::fs;
use std::path::Path;

use actionbook_core_types::ActionTable;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use errors::LoaderError;

/// Recognized definition file extensions.
const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Loads and merges every definition under `root`.
///
/// Files are visited in sorted order so a collision always blames the same
/// file on every load.
pub fn load_actions(root: &Path) -> Result<ActionTable, LoaderError> {
    // An unreadable root is a configuration error, not an empty table.
    fs::metadata(root).map_err(|source| LoaderError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut table = ActionTable::new();
    let mut files_loaded = 0usize;

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        let extension = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if EXTENSIONS.contains(&ext) => ext,
            _ => {
                debug!(path = %path.display(), "skipping non-definition file");
                continue;
            }
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read definition file, skipping");
                continue;
            }
        };

        let parsed = match parse_definitions(extension, &text) {
            Ok(map) => map,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "failed to parse definition file, skipping");
                continue;
            }
        };

        merge_file(&mut table, parsed, path)?;
        files_loaded += 1;
        info!(path = %path.display(), format = extension, "loaded definition file");
    }

    info!(
        files = files_loaded,
        actions = table.len(),
        root = %root.display(),
        "definition table built"
    );
    Ok(table)
}

fn parse_definitions(extension: &str, text: &str) -> Result<Map<String, Value>, String> {
    let value: Value = match extension {
        "json" => serde_json::from_str(text).map_err(|err| err.to_string())?,
        "toml" => toml::from_str(text).map_err(|err| err.to_string())?,
        other => return Err(format!("unsupported extension '{other}'")),
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => Err("top level must be a mapping of action names".to_string()),
    }
}

/// Merges one parsed file into the table. The whole file is rejected before
/// any of its keys are inserted.
fn merge_file(
    table: &mut ActionTable,
    parsed: Map<String, Value>,
    path: &Path,
) -> Result<(), LoaderError> {
    for name in parsed.keys() {
        if table.contains_key(name) {
            return Err(LoaderError::Conflict {
                name: name.clone(),
                path: path.to_path_buf(),
            });
        }
    }
    for (name, definition) in parsed {
        table.insert(name, definition);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, contents: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn merges_json_and_toml_sources() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "search.json",
            r#"{"search": {"type": "op", "steps": []}}"#,
        );
        write(
            &dir,
            "checks.toml",
            "[verify]\ntype = \"assert\"\nsteps = []\n",
        );

        let table = load_actions(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["search"]["type"], json!("op"));
        assert_eq!(table["verify"]["type"], json!("assert"));
    }

    #[test]
    fn walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "suite/login/flow.json",
            r#"{"login": {"type": "op", "steps": []}}"#,
        );

        let table = load_actions(dir.path()).unwrap();
        assert!(table.contains_key("login"));
    }

    #[test]
    fn parse_failures_skip_only_that_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.json", "{ this is not json");
        write(&dir, "broken.toml", "= also not toml [");
        write(
            &dir,
            "good.json",
            r#"{"good": {"type": "op", "steps": []}}"#,
        );

        let table = load_actions(dir.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("good"));
    }

    #[test]
    fn non_mapping_top_level_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "list.json", r#"[1, 2, 3]"#);

        let table = load_actions(dir.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unrecognized_extensions_are_ignored() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes.txt", "not definitions");
        write(&dir, "README", "no extension at all");

        let table = load_actions(dir.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn duplicate_names_abort_loading() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{"dup": {"type": "op", "steps": []}}"#);
        write(&dir, "b.json", r#"{"dup": {"type": "op", "steps": []}}"#);

        let err = load_actions(dir.path()).unwrap_err();
        match err {
            LoaderError::Conflict { name, path } => {
                assert_eq!(name, "dup");
                // Sorted walk order: a.json merges first, b.json collides.
                assert!(path.ends_with("b.json"));
            }
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = load_actions(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LoaderError::RootUnreadable { .. }));
    }

    #[test]
    fn empty_root_yields_an_empty_table() {
        let dir = TempDir::new().unwrap();
        assert!(load_actions(dir.path()).unwrap().is_empty());
    }
}
