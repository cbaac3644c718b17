use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};

/// Resolves a resource locator to raw bytes.
///
/// Fetches are blocking and are never retried here; a failure is reported once to the caller.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> CardResult<Vec<u8>>;
}

/// Default fetcher: plain and `file://` paths from disk, `http(s)://` over the network.
///
/// Relative paths resolve against `root`.
#[derive(Clone, Debug)]
pub struct ResourceFetcher {
    root: PathBuf,
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
}

impl ResourceFetcher {
    pub fn new(root: impl Into<PathBuf>) -> CardResult<Self> {
        Ok(Self {
            root: root.into(),
            #[cfg(feature = "http")]
            client: reqwest::blocking::Client::builder()
                .user_agent(concat!(
                    env!("CARGO_PKG_NAME"),
                    "/",
                    env!("CARGO_PKG_VERSION")
                ))
                .build()
                .context("build http client")?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_file(&self, path: &Path) -> CardResult<Vec<u8>> {
        let path = self.root.join(path);
        std::fs::read(&path)
            .with_context(|| format!("read resource bytes from '{}'", path.display()))
            .map_err(CardError::from)
    }

    #[cfg(feature = "http")]
    fn fetch_http(&self, url: &str) -> CardResult<Vec<u8>> {
        tracing::debug!(url, "fetching resource");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request '{url}'"))?
            .error_for_status()
            .with_context(|| format!("request '{url}'"))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("read response body of '{url}'"))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    fn fetch_http(&self, url: &str) -> CardResult<Vec<u8>> {
        Err(CardError::validation(format!(
            "cannot fetch '{url}': built without http support"
        )))
    }
}

impl ImageFetcher for ResourceFetcher {
    fn fetch(&self, location: &str) -> CardResult<Vec<u8>> {
        if let Some(path) = location.strip_prefix("file://") {
            return self.read_file(Path::new(path));
        }
        if location.starts_with("http://") || location.starts_with("https://") {
            return self.fetch_http(location);
        }
        if let Some((scheme, _)) = location.split_once("://") {
            return Err(CardError::validation(format!(
                "unsupported resource scheme '{scheme}' in '{location}'"
            )));
        }
        self.read_file(Path::new(location))
    }
}

/// In-memory fetcher keyed by exact locator, for preloaded or synthetic resources.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.resources.insert(location.into(), bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, location: &str) -> CardResult<Vec<u8>> {
        self.resources
            .get(location)
            .cloned()
            .ok_or_else(|| CardError::validation(format!("no resource registered for '{location}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
