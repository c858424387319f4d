use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;

/// State shared by the axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// JSON document holding `current_target`, re-read on every request
    redirect_file: PathBuf,
    /// Short path served by the redirect route, without the leading slash
    redirect_path: String,
}

impl SharedState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                redirect_file: config.redirect_file.clone(),
                redirect_path: config.redirect_path.clone(),
            }),
        }
    }

    pub fn redirect_file(&self) -> &Path {
        &self.inner.redirect_file
    }

    pub fn redirect_path(&self) -> &str {
        &self.inner.redirect_path
    }
}
