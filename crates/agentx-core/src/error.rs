//! Error types for AgentX

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed manifest at {}: {reason}", .path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("type not found: {0}")]
    NotFound(String),

    #[error("invalid type path '{path}': {reason}")]
    InvalidTypePath { path: String, reason: String },

    #[error("{0} lists itself as a dependency")]
    SelfDependency(String),

    #[error("type not installed: {0}")]
    NotInstalled(String),

    #[error("already linked: {0}")]
    AlreadyLinked(String),

    #[error("not linked: {0}")]
    NotLinked(String),

    #[error("{0} types cannot be linked to a project")]
    NotLinkable(String),

    #[error("project already initialized at {}", .0.display())]
    ProjectExists(PathBuf),

    #[error("copy failed from {} to {}: {cause}", .from.display(), .to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        cause: String,
    },

    #[error("post-install hook failed for {type_path}: {cause}")]
    PostInstallHookFailed { type_path: String, cause: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn invalid_type_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypePath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn copy_failure(from: &Path, to: &Path, cause: impl Into<String>) -> Self {
        Self::CopyFailure {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            cause: cause.into(),
        }
    }

    pub fn post_install(type_path: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::PostInstallHookFailed {
            type_path: type_path.into(),
            cause: cause.into(),
        }
    }
}

/// Non-fatal conditions accumulated during install and link-sync.
///
/// Warnings are structured values, not log lines, so callers can re-diagnose
/// them (the health-check command consumes these).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A required token has no default; the user must fill it in tokens.env.
    MissingToken { skill: String, token: String },
    /// A skill's language runtime is not on PATH; its deps were not fetched.
    RuntimeMissing { type_path: String, runtime: String },
    /// A linked type has no readable manifest under the installed root.
    ManifestMissing { type_path: String },
    /// A linked context path is not installed; no symlink was created.
    LinkTargetMissing { context_path: String },
    /// A project declares a provider id that has no spec row.
    UnknownProvider { provider: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken { skill, token } => {
                write!(f, "{}: token {} is required and has no default", skill, token)
            }
            Self::RuntimeMissing { type_path, runtime } => {
                write!(f, "{}: runtime '{}' not on PATH, skipped dependency fetch", type_path, runtime)
            }
            Self::ManifestMissing { type_path } => {
                write!(f, "no manifest for linked type {}", type_path)
            }
            Self::LinkTargetMissing { context_path } => {
                write!(f, "context {} is not installed, symlink skipped", context_path)
            }
            Self::UnknownProvider { provider } => {
                write!(f, "unknown provider '{}', skipped", provider)
            }
        }
    }
}
