//! Code component records as emitted by the repository scanner.
//!
//! The scanner writes one JSON object keyed by component ID:
//!
//! ```json
//! {
//!   "pkg.mod.Parser": {
//!     "id": "pkg.mod.Parser",
//!     "component_type": "class",
//!     "file_path": "/abs/pkg/mod.py",
//!     "relative_path": "pkg/mod.py",
//!     "depends_on": ["pkg.mod.Token"],
//!     "docstring": "..."
//!   }
//! }
//! ```
//!
//! Fields this crate does not model (line ranges, source text, etc.) are kept
//! in [`Component::extra`] so a filtered output has the same shape as the
//! input.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// All components of one repository, keyed by component ID.
pub type ComponentSet = BTreeMap<String, Component>;

/// The three kinds of code component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Class,
    Function,
    Method,
}

impl ComponentType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One code unit (class, function, or method) discovered by the scanner.
///
/// Immutable once loaded; the engine only reads `depends_on`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub component_type: ComponentType,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub relative_path: String,
    /// IDs this component references. May point outside the repository.
    #[serde(default)]
    pub depends_on: BTreeSet<String>,
    /// Scanner fields not modelled here (`id`, `docstring`, line ranges),
    /// passed through untouched, explicit nulls included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Component {
    /// Create a component with no dependencies.
    #[must_use]
    pub fn new(component_type: ComponentType, relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        Self {
            component_type,
            file_path: relative_path.clone(),
            relative_path,
            depends_on: BTreeSet::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Builder-style helper that replaces `depends_on`.
    #[must_use]
    pub fn with_depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// Errors raised while reading or writing component JSON.
#[derive(Debug, thiserror::Error)]
pub enum ComponentIoError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse component JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a component set from a JSON string.
///
/// # Errors
///
/// Returns the underlying `serde_json` error for malformed input.
pub fn parse_components(json: &str) -> Result<ComponentSet, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load a component set from the scanner's JSON output.
///
/// # Errors
///
/// Returns [`ComponentIoError::Read`] if the file cannot be read and
/// [`ComponentIoError::Parse`] if it is not a valid component map.
pub fn load_components(path: &Path) -> Result<ComponentSet, ComponentIoError> {
    let content = fs::read_to_string(path).map_err(|source| ComponentIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let components = parse_components(&content).map_err(|source| ComponentIoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), count = components.len(), "loaded components");
    Ok(components)
}

/// A rank-ordered view over a subset of a [`ComponentSet`].
///
/// Serializes as a JSON object whose keys follow `ids` order. IDs missing
/// from `components` are skipped.
#[derive(Debug, Clone, Copy)]
pub struct SelectedComponents<'a> {
    components: &'a ComponentSet,
    ids: &'a [String],
}

impl<'a> SelectedComponents<'a> {
    #[must_use]
    pub const fn new(components: &'a ComponentSet, ids: &'a [String]) -> Self {
        Self { components, ids }
    }

    /// Number of entries that will actually be serialized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids
            .iter()
            .filter(|id| self.components.contains_key(id.as_str()))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for SelectedComponents<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for id in self.ids {
            if let Some(component) = self.components.get(id.as_str()) {
                map.serialize_entry(id, component)?;
            }
        }
        map.end()
    }
}

/// Write the selected components to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ComponentIoError::Write`] on any I/O or encoding failure.
pub fn write_components(
    path: &Path,
    selected: &SelectedComponents<'_>,
) -> Result<(), ComponentIoError> {
    let wrap = |source: std::io::Error| ComponentIoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, selected).map_err(|e| wrap(e.into()))?;
    writeln!(writer).map_err(wrap)?;
    writer.flush().map_err(wrap)?;

    debug!(path = %path.display(), count = selected.len(), "wrote components");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pkg.a": {
            "id": "pkg.a",
            "component_type": "function",
            "file_path": "/repo/pkg/a.py",
            "relative_path": "pkg/a.py",
            "depends_on": ["pkg.b", "os.path.join"],
            "start_line": 3,
            "has_docstring": false
        },
        "pkg.b": {
            "component_type": "class",
            "file_path": "/repo/pkg/b.py",
            "relative_path": "pkg/b.py",
            "depends_on": [],
            "docstring": "Ünïcode docs"
        }
    }"#;

    #[test]
    fn parses_known_and_extra_fields() {
        let components = parse_components(SAMPLE).expect("valid sample");
        assert_eq!(components.len(), 2);

        let a = &components["pkg.a"];
        assert_eq!(a.component_type, ComponentType::Function);
        assert_eq!(a.extra["id"], "pkg.a");
        assert!(a.depends_on.contains("os.path.join"));
        assert_eq!(a.extra["start_line"], serde_json::json!(3));

        let b = &components["pkg.b"];
        assert!(!b.extra.contains_key("id"));
        assert_eq!(b.extra["docstring"], "Ünïcode docs");
    }

    #[test]
    fn null_fields_survive_a_rewrite() {
        let input = r#"{"pkg.c": {"id": null, "component_type": "method",
            "file_path": "c.py", "relative_path": "c.py", "depends_on": [], "docstring": null}}"#;
        let components = parse_components(input).expect("valid input");

        let value = serde_json::to_value(&components).expect("serialize");
        let c = &value["pkg.c"];
        assert!(c.get("id").is_some_and(serde_json::Value::is_null));
        assert!(c.get("docstring").is_some_and(serde_json::Value::is_null));
        assert_eq!(c["component_type"], "method");
    }

    #[test]
    fn rejects_unknown_component_type() {
        let err = parse_components(
            r#"{"x": {"component_type": "module", "file_path": "", "relative_path": ""}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn component_type_displays_lowercase() {
        assert_eq!(ComponentType::Function.to_string(), "function");
        assert_eq!(ComponentType::Class.to_string(), "class");
    }

    #[test]
    fn selected_components_preserve_rank_order_and_skip_unknown() {
        let components = parse_components(SAMPLE).expect("valid sample");
        let ids = vec![
            "pkg.b".to_string(),
            "missing".to_string(),
            "pkg.a".to_string(),
        ];
        let selected = SelectedComponents::new(&components, &ids);
        assert_eq!(selected.len(), 2);

        let json = serde_json::to_string(&selected).expect("serialize");
        let b_pos = json.find("\"pkg.b\"").expect("pkg.b present");
        let a_pos = json.find("\"pkg.a\"").expect("pkg.a present");
        assert!(b_pos < a_pos, "keys follow selection order: {json}");
        assert!(!json.contains("missing"));
        assert!(json.contains("\"start_line\":3"), "extra fields round-trip");
    }

    #[test]
    fn load_and_write_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("graph.json");
        std::fs::write(&input, SAMPLE).expect("write sample");

        let components = load_components(&input).expect("load");
        let ids = vec!["pkg.a".to_string()];
        let output = dir.path().join("out.json");
        write_components(&output, &SelectedComponents::new(&components, &ids)).expect("write");

        let reloaded = load_components(&output).expect("reload");
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded["pkg.a"], components["pkg.a"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_components(&dir.path().join("nope.json")).expect_err("missing");
        assert!(matches!(err, ComponentIoError::Read { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "[1, 2, 3]").expect("write");
        let err = load_components(&input).expect_err("not a map");
        assert!(matches!(err, ComponentIoError::Parse { .. }));
    }
}
