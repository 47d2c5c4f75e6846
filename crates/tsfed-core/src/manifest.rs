//! `tsfed.toml` federation manifest
//!
//! ```toml
//! [compile]
//! program = "build/program.json"
//! output = "@types/types.d.ts"
//! layout = "flat"
//!
//! [compile.modules]
//! "app/Button" = "src/Button.tsx"
//!
//! [remote]
//! destination = "@types-remote"
//!
//! [remote.modules]
//! "https://cdn.example.com/app/types.d.ts" = "app.d.ts"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_OUTPUT: &str = "@types/types.d.ts";
pub const DEFAULT_REMOTE_DESTINATION: &str = "@types-remote";
pub const DEFAULT_PRIVATE_NAMESPACE: &str = "__private";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationManifest {
    pub compile: CompileConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Semantic snapshot written by the front end
    pub program: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub layout: LayoutKind,
    #[serde(default = "default_private_namespace")]
    pub private_namespace: String,
    /// Declaration files prepended verbatim to the output
    #[serde(default)]
    pub additional_declarations: Vec<PathBuf>,
    /// Logical module name -> implementation file
    #[serde(default)]
    pub modules: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Flat,
    Namespaced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_destination")]
    pub destination: PathBuf,
    /// Remote URL -> file name under `destination`
    #[serde(default)]
    pub modules: IndexMap<String, String>,
}

fn default_private_namespace() -> String {
    DEFAULT_PRIVATE_NAMESPACE.to_string()
}

fn default_remote_destination() -> PathBuf {
    PathBuf::from(DEFAULT_REMOTE_DESTINATION)
}

impl FederationManifest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::ManifestRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let manifest: FederationManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.compile.modules.is_empty() {
            return Err(CoreError::InvalidManifest(
                "[compile.modules] must list at least one entry point".to_string(),
            ));
        }

        for (name, path) in &self.compile.modules {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidManifest(format!(
                    "Entry point '{path}' has an empty module name"
                )));
            }
        }

        if self.compile.layout == LayoutKind::Namespaced
            && !is_identifier(&self.compile.private_namespace)
        {
            return Err(CoreError::InvalidManifest(format!(
                "private_namespace '{}' is not a valid identifier",
                self.compile.private_namespace
            )));
        }

        if let Some(remote) = &self.remote {
            for (url, destination) in &remote.modules {
                for path in [url, destination] {
                    if !path.ends_with(".ts") {
                        return Err(CoreError::InvalidManifest(format!(
                            "The file extension must be \".ts\" - {path}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.compile
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

impl FromStr for FederationManifest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
