use crate::adapters::archive::{is_archive, unpack_snapshot};
use crate::domain::ports::{DocumentSource, Storage};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::is_http_location;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub struct FileSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> FileSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> DocumentSource for FileSource<S> {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let data = self.storage.read_file(&self.path).await?;
        tracing::debug!("Read {} bytes from '{}'", data.len(), self.path);

        if is_archive(&self.path) {
            unpack_snapshot(&self.path, &data)
        } else {
            Ok(data)
        }
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

pub struct HttpSource {
    client: Client,
    url: String,
    headers: HashMap<String, String>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            headers: HashMap::new(),
        })
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Downloading snapshot from: {}", self.url);

        let mut request = self.client.get(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Snapshot response status: {}", status);

        if !status.is_success() {
            return Err(ImportError::HttpStatusError {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await?.to_vec();
        if is_archive(&self.url) {
            unpack_snapshot(&self.url, &data)
        } else {
            Ok(data)
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// 依照位置挑選來源：http(s) 走網路，其餘當成本機檔案
pub fn source_for<S: Storage + 'static>(
    location: &str,
    storage: S,
    timeout: Duration,
    headers: HashMap<String, String>,
) -> Result<Box<dyn DocumentSource>> {
    if is_http_location(location) {
        Ok(Box::new(HttpSource::new(location, timeout)?.with_headers(headers)))
    } else {
        Ok(Box::new(FileSource::new(storage, location)))
    }
}
