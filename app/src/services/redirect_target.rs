//! Redirect target document: `{ "current_target": "<url>" }`.
//!
//! Read fresh on every call, so edits take effect without a restart.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid redirect document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("current_target is missing or empty")]
    MissingTarget,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectDocument {
    #[serde(default)]
    pub current_target: Option<String>,
}

impl RedirectDocument {
    /// The trimmed target, if present and non-blank.
    pub fn target(&self) -> Result<String, TargetError> {
        self.current_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(TargetError::MissingTarget)
    }
}

/// Read the document at `path` and return its target URL.
pub async fn load_current_target(path: &Path) -> Result<String, TargetError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TargetError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let doc: RedirectDocument = serde_json::from_str(&raw)?;
    doc.target()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qr-target-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("redirect.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_trimmed_target() {
        let path = temp_file(r#"{ "current_target": "  https://example.com/  " }"#);
        assert_eq!(load_current_target(&path).await.unwrap(), "https://example.com/");
    }

    #[tokio::test]
    async fn ignores_extra_fields() {
        let path = temp_file(r#"{ "current_target": "https://a.test/", "note": "spring menu" }"#);
        assert_eq!(load_current_target(&path).await.unwrap(), "https://a.test/");
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let err = load_current_target(Path::new("/nonexistent/redirect.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, TargetError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let path = temp_file("{ current_target: ");
        let err = load_current_target(&path).await.unwrap_err();
        assert!(matches!(err, TargetError::Parse(_)));
    }

    #[tokio::test]
    async fn blank_or_missing_target_is_rejected() {
        for body in [r#"{ "current_target": "   " }"#, "{}", r#"{ "current_target": null }"#] {
            let path = temp_file(body);
            let err = load_current_target(&path).await.unwrap_err();
            assert!(matches!(err, TargetError::MissingTarget), "{body}");
        }
    }
}
