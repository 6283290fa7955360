// src/index/extractor.rs

//! Pull script identifiers out of a container file.
//!
//! A reference is any `<Key>: <token>` occurrence on a line, where the key
//! match is case-insensitive and the token is a run of ASCII word characters.
//! The container format is not parsed beyond that.

use std::collections::BTreeSet;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{trace, warn};

use crate::errors::{PrefabIndexError, Result};
use crate::fs::FileSystem;
use crate::types::ScriptSet;

#[derive(Debug, Clone)]
pub struct Extractor {
    key: String,
    pattern: Regex,
}

impl Extractor {
    /// Compile the pattern for `key`.
    ///
    /// An empty key is a configuration error: without it nothing can be
    /// indexed.
    pub fn new(key: &str) -> Result<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(PrefabIndexError::ConfigError(
                "export key must not be empty".to_string(),
            ));
        }

        let source = format!(r"(?i:{})[ \t]*:[ \t]*([A-Za-z0-9_]+)", regex::escape(key));
        let pattern = Regex::new(&source)
            .map_err(|e| PrefabIndexError::ConfigError(format!("bad export key {key:?}: {e}")))?;

        Ok(Self {
            key: key.to_string(),
            pattern,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The compiled pattern, for diagnostics.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Extract from text already in memory.
    pub fn extract_str(&self, text: &str) -> ScriptSet {
        let mut scripts = BTreeSet::new();
        for line in text.lines() {
            self.collect_line(line, &mut scripts);
        }
        scripts
    }

    /// Extract line by line, so large scenes never sit in memory whole.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn extract_reader<R: BufRead>(&self, mut reader: R) -> io::Result<ScriptSet> {
        let mut scripts = BTreeSet::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.collect_line(&line, &mut scripts);
        }

        Ok(scripts)
    }

    /// Extract from a file on `fs`.
    ///
    /// Read failures are logged and yield an empty set.
    pub fn extract_file(&self, fs: &dyn FileSystem, path: &Path) -> ScriptSet {
        let reader = match fs.open_read(path) {
            Ok(r) => BufReader::new(r),
            Err(err) => {
                warn!(?path, error = %err, "failed to open container; treating as empty");
                return ScriptSet::new();
            }
        };

        match self.extract_reader(reader) {
            Ok(scripts) => {
                trace!(?path, count = scripts.len(), "extracted script references");
                scripts
            }
            Err(err) => {
                warn!(?path, error = %err, "failed to read container; treating as empty");
                ScriptSet::new()
            }
        }
    }

    fn collect_line(&self, line: &str, into: &mut ScriptSet) {
        for caps in self.pattern.captures_iter(line) {
            if let Some(m) = caps.get(1) {
                into.insert(m.as_str().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::io::Cursor;

    fn ids(items: &[&str]) -> ScriptSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_configured_key() {
        let ex = Extractor::new("ExportName").unwrap();
        let text = "--- !u!114 &1\nMonoBehaviour:\n  ExportName: PlayerController\n";
        assert_eq!(ex.extract_str(text), ids(&["PlayerController"]));
    }

    #[test]
    fn key_match_ignores_case_and_spacing() {
        let ex = Extractor::new("ExportName").unwrap();
        assert_eq!(ex.extract_str("exportname:   enemyai"), ids(&["enemyai"]));
    }

    #[test]
    fn no_match_yields_empty_set() {
        let ex = Extractor::new("ExportName").unwrap();
        assert!(ex.extract_str("m_Name: Player\nm_Enabled: 1\n").is_empty());
    }

    #[test]
    fn duplicates_collapse_and_token_stops_at_non_word() {
        let ex = Extractor::new("ExportName").unwrap();
        let text = "ExportName: Hud\n  ExportName: Hud.Extra\nEXPORTNAME:Menu_2 # trailing\n";
        assert_eq!(ex.extract_str(text), ids(&["Hud", "Menu_2"]));
    }

    #[test]
    fn value_on_next_line_is_not_a_reference() {
        let ex = Extractor::new("ExportName").unwrap();
        assert!(ex.extract_str("ExportName:\n  Player\n").is_empty());
    }

    #[test]
    fn key_is_trimmed_and_escaped_in_pattern() {
        let ex = Extractor::new("  a.b ").unwrap();
        assert_eq!(ex.key(), "a.b");
        assert!(ex.pattern().starts_with(r"(?i:a\.b)"));
    }

    #[test]
    fn key_is_matched_literally() {
        let ex = Extractor::new("a.b").unwrap();
        assert_eq!(ex.extract_str("a.b: One\naxb: Two\n"), ids(&["One"]));
    }

    #[test]
    fn reader_and_str_agree() {
        let ex = Extractor::new("ExportName").unwrap();
        let text = "x\r\nExportName: A\r\n\tExportName : B\nExportName: A\n";
        let from_reader = ex.extract_reader(Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(from_reader, ex.extract_str(text));
        assert_eq!(from_reader, ids(&["A", "B"]));
    }

    #[test]
    fn reader_tolerates_invalid_utf8() {
        let ex = Extractor::new("ExportName").unwrap();
        let bytes: &[u8] = b"\xff\xfe junk\nExportName: Boss\n";
        assert_eq!(ex.extract_reader(Cursor::new(bytes)).unwrap(), ids(&["Boss"]));
    }

    #[test]
    fn unreadable_file_is_empty() {
        let ex = Extractor::new("ExportName").unwrap();
        let fs = MockFileSystem::new();
        assert!(ex.extract_file(&fs, Path::new("/missing.prefab")).is_empty());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            Extractor::new("  "),
            Err(PrefabIndexError::ConfigError(_))
        ));
    }
}
