//! Concurrent download of remote declaration files

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use futures::StreamExt;
use indexmap::IndexMap;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use tsfed_core::manifest::RemoteConfig;

use crate::error::LoaderError;

const EXTENSION: &str = ".ts";

/// Result of downloading one remote file
#[derive(Debug)]
pub struct FetchOutcome {
    pub url: String,
    pub destination: PathBuf,
    /// Bytes written on success
    pub result: Result<u64, LoaderError>,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct RemoteLoader {
    client: reqwest::Client,
    destination: PathBuf,
}

impl RemoteLoader {
    pub fn new(destination: impl Into<PathBuf>) -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("tsfed")
            .build()?;
        Ok(Self::with_client(client, destination))
    }

    pub fn with_client(client: reqwest::Client, destination: impl Into<PathBuf>) -> Self {
        Self {
            client,
            destination: destination.into(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, LoaderError> {
        Self::new(&config.destination)
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Both ends of every entry must be TypeScript files
    pub fn validate(modules: &IndexMap<String, String>) -> Result<(), LoaderError> {
        for (url, file) in modules {
            let parsed = reqwest::Url::parse(url).map_err(|_| LoaderError::InvalidUrl {
                url: url.clone(),
            })?;
            if !parsed.path().ends_with(EXTENSION) {
                return Err(LoaderError::InvalidExtension { path: url.clone() });
            }
            if !file.ends_with(EXTENSION) {
                return Err(LoaderError::InvalidExtension { path: file.clone() });
            }
        }
        Ok(())
    }

    /// Download every `url -> file` entry into the destination folder.
    ///
    /// Invalid entries fail the whole call before anything is downloaded.
    /// After that each entry succeeds or fails on its own.
    pub async fn fetch_all(
        &self,
        modules: &IndexMap<String, String>,
    ) -> Result<Vec<FetchOutcome>, LoaderError> {
        Self::validate(modules)?;
        tokio::fs::create_dir_all(&self.destination).await?;

        info!(
            "Fetching {} remote declaration file(s) into {}",
            modules.len(),
            self.destination.display()
        );
        let outcomes = join_all(
            modules
                .iter()
                .map(|(url, file)| self.fetch_one(url, file)),
        )
        .await;

        let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
        if failed > 0 {
            warn!("{} of {} download(s) failed", failed, outcomes.len());
        }
        Ok(outcomes)
    }

    async fn fetch_one(&self, url: &str, file: &str) -> FetchOutcome {
        let destination = self.destination.join(file);
        let result = self.download(url, &destination).await;

        match result {
            Ok(bytes) => debug!("Downloaded {} ({} bytes) to {}", url, bytes, destination.display()),
            Err(ref e) => {
                warn!("Failed to download {}: {}", url, e);
                if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
                    if let Err(remove) = tokio::fs::remove_file(&destination).await {
                        warn!("Could not remove {}: {}", destination.display(), remove);
                    }
                }
            }
        }

        FetchOutcome {
            url: url.to_string(),
            destination,
            result,
        }
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<u64, LoaderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut output = tokio::fs::File::create(destination).await?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            output.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        output.flush().await?;
        Ok(written)
    }
}
