//! Change detection for text observations
//!
//! The first observed content becomes the baseline and is persisted to the
//! content file. Later observations are compared against the last seen
//! content; JSON documents are pretty-printed first so formatting noise does
//! not count as a change. A document whose pretty form would not reproduce it
//! exactly, such as one with integers beyond 64 bits, is compared as raw text
//! instead. Every differing content is written next to the
//! baseline as `<content file>.<md5>` for offline diffing; the baseline file
//! itself is never overwritten.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::Evaluation;
use crate::error::ConditionError;

#[derive(Debug)]
pub struct ContentDiffCondition {
    storage_path: PathBuf,
    warn_when: bool,
    last_seen: Option<String>,
}

impl ContentDiffCondition {
    pub fn new(storage_path: impl Into<PathBuf>, warn_when: bool) -> Self {
        Self {
            storage_path: storage_path.into(),
            warn_when,
            last_seen: None,
        }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn warn_when(&self) -> bool {
        self.warn_when
    }

    /// True when `content` differs from the previously seen content
    pub async fn evaluate(&mut self, content: &str) -> Result<Evaluation, ConditionError> {
        let current = normalize(content);

        if self.last_seen.is_none() {
            self.last_seen = self.load_baseline().await?;
        }

        let Some(previous) = self.last_seen.as_deref() else {
            persist(&self.storage_path, &current).await?;
            info!("Stored content baseline at {}", self.storage_path.display());
            let description = format!(
                "baseline stored at {} ({} chars)",
                self.storage_path.display(),
                current.chars().count()
            );
            self.last_seen = Some(current);
            return Ok(Evaluation::new(false, description));
        };

        if previous == current {
            return Ok(Evaluation::new(false, "content unchanged"));
        }

        let offset = first_difference(previous, &current);
        let side_path = self.side_path(&current);
        persist(&side_path, &current).await?;
        debug!(
            "Content differs at {}; wrote {}",
            offset,
            side_path.display()
        );

        let description = format!(
            "content differs at character {}; new content written to {}",
            offset,
            side_path.display()
        );
        self.last_seen = Some(current);

        Ok(Evaluation {
            first_difference: Some(offset),
            ..Evaluation::new(true, description)
        })
    }

    async fn load_baseline(&self) -> Result<Option<String>, ConditionError> {
        match fs::read_to_string(&self.storage_path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConditionError::Storage {
                path: self.storage_path.clone(),
                source,
            }),
        }
    }

    fn side_path(&self, content: &str) -> PathBuf {
        let mut name = OsString::from(self.storage_path.as_os_str());
        name.push(format!(".{:x}", md5::compute(content.as_bytes())));
        PathBuf::from(name)
    }
}

async fn persist(path: &Path, content: &str) -> Result<(), ConditionError> {
    let to_error = |source| ConditionError::Storage {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    fs::write(path, content).await.map_err(to_error)
}

/// Pretty-print JSON-shaped input so that formatting differences vanish.
///
/// Input is returned unchanged unless re-serializing the parsed document
/// reproduces it up to whitespace.
pub fn normalize(content: &str) -> String {
    let trimmed = content.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return content.to_string();
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return content.to_string();
    };
    match (serde_json::to_string(&value), serde_json::to_string_pretty(&value)) {
        (Ok(compact), Ok(pretty)) if compact == strip_whitespace(content) => pretty,
        _ => content.to_string(),
    }
}

/// JSON text with whitespace outside string literals removed
fn strip_whitespace(content: &str) -> String {
    let mut stripped = String::with_capacity(content.len());
    let (mut in_string, mut escaped) = (false, false);

    for c in content.chars() {
        if in_string {
            stripped.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if !matches!(c, ' ' | '\t' | '\n' | '\r') {
            in_string = c == '"';
            stripped.push(c);
        }
    }
    stripped
}

/// Character index where two strings first diverge
pub fn first_difference(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.chars().count().min(b.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn condition_in(dir: &TempDir) -> ContentDiffCondition {
        ContentDiffCondition::new(dir.path().join("baseline.txt"), true)
    }

    #[tokio::test]
    async fn test_first_call_stores_baseline() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        let evaluation = condition.evaluate("hello").await.unwrap();

        assert!(!evaluation.result);
        assert_eq!(
            fs::read_to_string(dir.path().join("baseline.txt")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn test_unchanged_content_is_false() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition.evaluate("hello").await.unwrap();
        assert!(!condition.evaluate("hello").await.unwrap().result);
        assert!(!condition.evaluate("hello").await.unwrap().result);
    }

    #[tokio::test]
    async fn test_changed_content_reports_offset_and_writes_side_file() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition.evaluate("status: ok").await.unwrap();
        let evaluation = condition.evaluate("status: down").await.unwrap();

        assert!(evaluation.result);
        assert_eq!(evaluation.first_difference, Some(8));

        let side = condition.side_path("status: down");
        assert_eq!(fs::read_to_string(side).unwrap(), "status: down");
        assert_eq!(
            fs::read_to_string(dir.path().join("baseline.txt")).unwrap(),
            "status: ok"
        );

        // The new content is now the comparison point
        assert!(!condition.evaluate("status: down").await.unwrap().result);
    }

    #[tokio::test]
    async fn test_json_formatting_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition.evaluate("{\"a\":1}").await.unwrap();
        assert!(!condition.evaluate("{\"a\": 1}").await.unwrap().result);
        assert!(!condition.evaluate("{\n  \"a\" : 1\n}").await.unwrap().result);
    }

    #[tokio::test]
    async fn test_json_offset_uses_pretty_form() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition.evaluate("{\"a\":1}").await.unwrap();
        let evaluation = condition.evaluate("{\"a\":2}").await.unwrap();

        let before = normalize("{\"a\":1}");
        let after = normalize("{\"a\":2}");
        assert_eq!(
            evaluation.first_difference,
            Some(first_difference(&before, &after))
        );
        assert_eq!(evaluation.first_difference, Some(9));
    }

    #[tokio::test]
    async fn test_existing_baseline_file_is_used() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("baseline.txt"), "v1").unwrap();
        let mut condition = condition_in(&dir);

        let evaluation = condition.evaluate("v2").await.unwrap();
        assert!(evaluation.result);
        assert_eq!(evaluation.first_difference, Some(1));
    }

    #[tokio::test]
    async fn test_empty_content_edges() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition.evaluate("").await.unwrap();
        assert!(!condition.evaluate("").await.unwrap().result);

        let evaluation = condition.evaluate("data").await.unwrap();
        assert!(evaluation.result);
        assert_eq!(evaluation.first_difference, Some(0));

        let evaluation = condition.evaluate("").await.unwrap();
        assert!(evaluation.result);
        assert_eq!(evaluation.first_difference, Some(0));
    }

    #[tokio::test]
    async fn test_baseline_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("content.json");
        let mut condition = ContentDiffCondition::new(&path, false);

        condition.evaluate("[1,2]").await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("abc", "abd"), 2);
        assert_eq!(first_difference("abc", "abcdef"), 3);
        assert_eq!(first_difference("", "x"), 0);
        assert_eq!(first_difference("same", "same"), 4);
    }

    #[tokio::test]
    async fn test_large_integers_are_not_merged() {
        let dir = TempDir::new().unwrap();
        let mut condition = condition_in(&dir);

        condition
            .evaluate("{\"id\": 123456789012345678901}")
            .await
            .unwrap();
        let evaluation = condition
            .evaluate("{\"id\": 123456789012345678902}")
            .await
            .unwrap();

        assert!(evaluation.result);
        assert_eq!(evaluation.first_difference, Some(27));
    }

    #[test]
    fn test_normalize_keeps_inexact_documents_raw() {
        let big = "{\"id\": 123456789012345678901}";
        assert_eq!(normalize(big), big);
        assert_eq!(normalize("[0.10000000000000000001]"), "[0.10000000000000000001]");
        assert_eq!(normalize("[\"\\u0041\"]"), "[\"\\u0041\"]");
        assert_eq!(normalize("[ \"a b\" , 1 ]"), "[\n  \"a b\",\n  1\n]");
    }

    #[test]
    fn test_strip_whitespace_keeps_string_contents() {
        assert_eq!(
            strip_whitespace("{ \"k\" : \"a \\\" b\" }"),
            "{\"k\":\"a \\\" b\"}"
        );
    }

    #[test]
    fn test_normalize_leaves_invalid_json() {
        assert_eq!(normalize("{not json"), "{not json");
        assert_eq!(normalize("plain"), "plain");
    }
}
