//! Blocking facade over [`crate::StorageClient`]
//!
//! Every call blocks the calling thread until its round trip completes.
//! The facade drives its own current-thread runtime, so it must not be
//! used from inside an async context.

use crate::{types::*, ClientError, Config, ConfigLookup, Credential, Result};
use std::io::Write;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;
use tokio::runtime::{Builder, Runtime};

/// Blocking Dropbox storage client
pub struct StorageClient {
    inner: crate::StorageClient,
    runtime: Runtime,
}

impl StorageClient {
    /// Create a new client with the given configuration and credential
    pub fn new(config: Config, credential: Credential) -> Result<Self> {
        Self::from_async(crate::StorageClient::new(config, credential)?)
    }

    /// Resolve the credential from an explicit token or the configuration
    /// source, then build the client.
    pub fn from_lookup(
        explicit: Option<String>,
        lookup: &dyn ConfigLookup,
        config: Config,
    ) -> Result<Self> {
        Self::from_async(crate::StorageClient::from_lookup(explicit, lookup, config)?)
    }

    /// Wrap an existing async client
    pub fn from_async(inner: crate::StorageClient) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Io)?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async client
    pub fn inner(&self) -> &crate::StorageClient {
        &self.inner
    }

    pub fn access_token(&self) -> &str {
        self.inner.access_token()
    }

    pub fn account_info(&self) -> Result<AccountInfo> {
        self.runtime.block_on(self.inner.account_info())
    }

    pub fn metadata(&self, path: &str) -> Result<Entry> {
        self.runtime.block_on(self.inner.metadata(path))
    }

    pub fn list(&self, path: &str) -> Result<Listing> {
        self.runtime.block_on(self.inner.list(path))
    }

    pub fn create_folder(&self, path: &str) -> Result<FolderEntry> {
        self.runtime.block_on(self.inner.create_folder(path))
    }

    pub fn upload(&self, source: impl AsRef<Path>, remote_path: &str) -> Result<FileEntry> {
        self.runtime
            .block_on(self.inner.upload(source.as_ref(), remote_path))
    }

    pub fn download(&self, remote_path: &str, destination: impl AsRef<Path>) -> Result<FileEntry> {
        self.runtime
            .block_on(self.inner.download(remote_path, destination.as_ref()))
    }

    /// Stream `remote_path` into a blocking writer
    pub fn download_to(&self, remote_path: &str, sink: &mut (dyn Write + Send)) -> Result<FileEntry> {
        let mut sink = BlockingSink(sink);
        self.runtime
            .block_on(self.inner.download_to(remote_path, &mut sink))
    }

    pub fn download_as_string(&self, remote_path: &str) -> Result<String> {
        self.runtime
            .block_on(self.inner.download_as_string(remote_path))
    }

    pub fn delete(&self, remote_path: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete(remote_path))
    }
}

/// Adapts a blocking writer to `AsyncWrite`; each poll performs the write
/// inline, which is fine because the caller is already blocked.
struct BlockingSink<'a>(&'a mut (dyn Write + Send));

impl AsyncWrite for BlockingSink<'_> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(self.0.write(buf))
    }

    fn poll_flush(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(self.0.flush())
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(self.0.flush())
    }
}
