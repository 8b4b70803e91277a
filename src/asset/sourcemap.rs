//! Source map model and sidecar handling.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{FinalizeError, MapOrigin, Result};

/// Matches a `//# sourceMappingURL=...` comment up to the end of its line.
static MAPPING_URL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//# sourceMappingURL=.*$").unwrap());

/// A source map (revision 3).
///
/// Only the fields the finalizer rewrites are typed; everything else
/// (`version`, `names`, `mappings`, `sourceRoot`, extensions) is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// `None` when the map has no top-level `sources` (index maps); entries
    /// may be `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Option<String>>>,

    #[serde(
        rename = "sourcesContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sources_content: Option<Vec<Option<String>>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceMap {
    /// Parse a serialized map.
    pub fn parse(json: &str, origin: MapOrigin) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| FinalizeError::MalformedMap { origin, source })
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("source map holds only strings and JSON values")
    }

    /// Embed the original source as the only `sourcesContent` entry.
    pub fn embed_source(&mut self, source: &str) {
        self.sources_content = Some(vec![Some(source.to_owned())]);
    }

    /// Point the map at a single source URL.
    pub fn set_single_source(&mut self, url: String) {
        self.sources = Some(vec![Some(url)]);
    }

    /// The `index`-th source, if present and not `null`.
    pub fn source(&self, index: usize) -> Option<&str> {
        self.sources.as_ref()?.get(index)?.as_deref()
    }

    /// The `mappings` string, if present.
    pub fn mappings(&self) -> Option<&str> {
        self.extra.get("mappings").and_then(Value::as_str)
    }
}

/// Path of the sidecar map for a bundle: `app-bundle.js` → `app-bundle.js.map`.
pub fn sidecar_path(source_file: &Path) -> PathBuf {
    let mut os: OsString = source_file.as_os_str().to_owned();
    os.push(".map");
    PathBuf::from(os)
}

/// Load the sidecar map of a pre-bundled asset.
pub fn load_sidecar(source_file: &Path) -> Result<SourceMap> {
    let path = sidecar_path(source_file);
    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FinalizeError::MissingSourceMap { path });
        }
        Err(e) => return Err(FinalizeError::io(&path, e)),
    };
    SourceMap::parse(&json, MapOrigin::Sidecar)
}

/// Remove existing `sourceMappingURL` comments and trailing whitespace.
pub fn strip_mapping_comment(code: &str) -> String {
    MAPPING_URL_COMMENT
        .replace_all(code, "")
        .trim_end()
        .to_owned()
}

/// Append the reference comment pointing at `url`.
pub fn append_mapping_comment(mut code: String, url: &str) -> String {
    code.push_str("\n//# sourceMappingURL=");
    code.push_str(url);
    code.push('\n');
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MAP: &str = r#"{"version":3,"sources":["app.js"],"names":["a"],"mappings":"AAAA,IAAIA"}"#;

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let mut map = SourceMap::parse(MAP, MapOrigin::Minifier).unwrap();
        assert_eq!(map.source(0), Some("app.js"));
        assert_eq!(map.mappings(), Some("AAAA,IAAIA"));

        map.file = Some("app.js".into());
        let json: Value = serde_json::from_str(&map.to_json()).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["names"][0], "a");
        assert_eq!(json["file"], "app.js");
        assert!(json.get("sourcesContent").is_none());
    }

    #[test]
    fn test_parse_malformed() {
        let err = SourceMap::parse("{not json", MapOrigin::Minifier).unwrap_err();
        assert!(matches!(
            err,
            FinalizeError::MalformedMap {
                origin: MapOrigin::Minifier,
                ..
            }
        ));
    }

    #[test]
    fn test_embed_and_single_source() {
        let mut map = SourceMap::parse(MAP, MapOrigin::Minifier).unwrap();
        map.embed_source("var a = 1;");
        map.set_single_source("/assets/sources/app-1.js".into());

        let json: Value = serde_json::from_str(&map.to_json()).unwrap();
        assert_eq!(json["sourcesContent"], serde_json::json!(["var a = 1;"]));
        assert_eq!(json["sources"], serde_json::json!(["/assets/sources/app-1.js"]));
    }

    #[test]
    fn test_sources_content_allows_null() {
        let map = SourceMap::parse(
            r#"{"version":3,"sources":["a.js","b.js"],"sourcesContent":["x",null],"mappings":""}"#,
            MapOrigin::Sidecar,
        )
        .unwrap();
        assert_eq!(
            map.sources_content,
            Some(vec![Some("x".to_string()), None])
        );
    }

    #[test]
    fn test_null_sources_round_trip() {
        let json = r#"{"version":3,"sources":[null,"b.js"],"names":[],"mappings":"AAAA"}"#;
        let map = SourceMap::parse(json, MapOrigin::Sidecar).unwrap();
        assert_eq!(map.source(0), None);
        assert_eq!(map.source(1), Some("b.js"));
        let back: Value = serde_json::from_str(&map.to_json()).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn test_index_map_round_trip() {
        let json = concat!(
            r#"{"version":3,"sections":[{"offset":{"line":0,"column":0},"#,
            r#""map":{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA"}}]}"#
        );
        let map = SourceMap::parse(json, MapOrigin::Sidecar).unwrap();
        assert_eq!(map.sources, None);
        let back: Value = serde_json::from_str(&map.to_json()).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
        assert!(back.get("sources").is_none());
    }

    #[test]
    fn test_load_sidecar() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("app-bundle.js");
        fs::write(sidecar_path(&js), MAP).unwrap();

        let map = load_sidecar(&js).unwrap();
        assert_eq!(map.source(0), Some("app.js"));
    }

    #[test]
    fn test_load_sidecar_missing() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("app-bundle.js");

        let err = load_sidecar(&js).unwrap_err();
        match err {
            FinalizeError::MissingSourceMap { path } => {
                assert_eq!(path, dir.path().join("app-bundle.js.map"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_sidecar_malformed() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("app-bundle.js");
        fs::write(sidecar_path(&js), "not a map").unwrap();

        assert!(matches!(
            load_sidecar(&js).unwrap_err(),
            FinalizeError::MalformedMap {
                origin: MapOrigin::Sidecar,
                ..
            }
        ));
    }

    #[test]
    fn test_strip_mapping_comment() {
        let bundled = "!function(){}();\n//# sourceMappingURL=app-bundle.js.map\n\n";
        assert_eq!(strip_mapping_comment(bundled), "!function(){}();");

        let plain = "var a=1;\n";
        assert_eq!(strip_mapping_comment(plain), "var a=1;");
    }

    #[test]
    fn test_strip_every_mapping_comment() {
        let code = "a();\n//# sourceMappingURL=a.js.map\nfoo();//# sourceMappingURL=x\nbar();\n";
        let stripped = strip_mapping_comment(code);
        assert!(!stripped.contains("sourceMappingURL"));
        assert_eq!(stripped, "a();\n\nfoo();\nbar();");
    }

    #[test]
    fn test_append_mapping_comment() {
        let out = append_mapping_comment("var a=1;".into(), "/assets/maps/a-1.js.map");
        assert_eq!(out, "var a=1;\n//# sourceMappingURL=/assets/maps/a-1.js.map\n");
    }
}
