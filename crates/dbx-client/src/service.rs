//! Injectable storage service interface

use crate::{types::*, Result, StorageClient};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWrite;

/// Storage operations as seen by application code.
///
/// Object safe, so it can be registered and resolved as
/// `Arc<dyn StorageService>`.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// The bearer token in use
    fn access_token(&self) -> &str;

    async fn account_info(&self) -> Result<AccountInfo>;

    async fn metadata(&self, path: &str) -> Result<Entry>;

    async fn list(&self, path: &str) -> Result<Listing>;

    async fn create_folder(&self, path: &str) -> Result<FolderEntry>;

    async fn upload(&self, source: &Path, remote_path: &str) -> Result<FileEntry>;

    async fn download(&self, remote_path: &str, destination: &Path) -> Result<FileEntry>;

    async fn download_to(
        &self,
        remote_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<FileEntry>;

    async fn download_as_string(&self, remote_path: &str) -> Result<String>;

    async fn delete(&self, remote_path: &str) -> Result<()>;
}

#[async_trait]
impl StorageService for StorageClient {
    fn access_token(&self) -> &str {
        StorageClient::access_token(self)
    }

    async fn account_info(&self) -> Result<AccountInfo> {
        StorageClient::account_info(self).await
    }

    async fn metadata(&self, path: &str) -> Result<Entry> {
        StorageClient::metadata(self, path).await
    }

    async fn list(&self, path: &str) -> Result<Listing> {
        StorageClient::list(self, path).await
    }

    async fn create_folder(&self, path: &str) -> Result<FolderEntry> {
        StorageClient::create_folder(self, path).await
    }

    async fn upload(&self, source: &Path, remote_path: &str) -> Result<FileEntry> {
        StorageClient::upload(self, source, remote_path).await
    }

    async fn download(&self, remote_path: &str, destination: &Path) -> Result<FileEntry> {
        StorageClient::download(self, remote_path, destination).await
    }

    async fn download_to(
        &self,
        remote_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<FileEntry> {
        StorageClient::download_to(self, remote_path, sink).await
    }

    async fn download_as_string(&self, remote_path: &str) -> Result<String> {
        StorageClient::download_as_string(self, remote_path).await
    }

    async fn delete(&self, remote_path: &str) -> Result<()> {
        StorageClient::delete(self, remote_path).await
    }
}
