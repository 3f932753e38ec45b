//! Main client implementation

use crate::{
    path::{is_root, normalize_path, to_api_path},
    transport::{bytes_body, file_body, Transport, TransportError},
    types::*,
    wire::{self, *},
    ClientError, Config, ConfigLookup, Credential, Result,
};
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Response;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

/// Dropbox storage client
///
/// Holds no per-call state; share one instance behind an `Arc`.
pub struct StorageClient {
    config: Config,
    transport: Transport,
}

impl StorageClient {
    /// Create a new client with the given configuration and credential
    pub fn new(config: Config, credential: Credential) -> Result<Self> {
        let transport =
            Transport::new(&config, credential).map_err(|e| ClientError::from_transport(e, "/"))?;

        Ok(Self { config, transport })
    }

    /// Create with default configuration and an explicit token
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(Config::default(), Credential::new(token))
    }

    /// Resolve the credential from an explicit token or the configuration
    /// source, then build the client.
    pub fn from_lookup(
        explicit: Option<String>,
        lookup: &dyn ConfigLookup,
        config: Config,
    ) -> Result<Self> {
        Self::new(config, Credential::resolve(explicit, lookup))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The credential in use
    pub fn credential(&self) -> &Credential {
        self.transport.credential()
    }

    /// The bearer token in use
    pub fn access_token(&self) -> &str {
        self.transport.credential().token()
    }

    // ==================== Account ====================

    /// Identity of the authenticated account
    #[instrument(skip(self))]
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let resp: AccountResponse = self
            .transport
            .call_no_arg(GET_CURRENT_ACCOUNT)
            .await
            .map_err(at(""))?;
        Ok(resp.into())
    }

    // ==================== Metadata ====================

    /// Attributes of the entry at `path`
    #[instrument(skip(self))]
    pub async fn metadata(&self, path: &str) -> Result<Entry> {
        let path = normalize_path(path);
        if is_root(&path) {
            return Ok(Entry::Folder(FolderEntry::root()));
        }

        let meta: TaggedMetadata = self
            .transport
            .call(GET_METADATA, &PathArg { path: &path })
            .await
            .map_err(at(&path))?;

        meta.into_entry(&path).ok_or_else(|| ClientError::NotFound {
            summary: "path/deleted".to_string(),
            path,
        })
    }

    /// Immediate children of the folder at `path`
    #[instrument(skip(self))]
    pub async fn list(&self, path: &str) -> Result<Listing> {
        let path = normalize_path(path);

        let mut page: ListFolderResponse = self
            .transport
            .call(
                LIST_FOLDER,
                &ListFolderArg {
                    path: to_api_path(&path),
                    recursive: false,
                    include_deleted: false,
                },
            )
            .await
            .map_err(at(&path))?;

        let mut entries = Vec::with_capacity(page.entries.len());
        loop {
            for meta in page.entries {
                match meta {
                    TaggedMetadata::File(file) => {
                        let fallback = wire::join_path(&path, &file.name);
                        entries.push(Entry::File(file.into_entry(&fallback)));
                    }
                    TaggedMetadata::Folder(folder) => {
                        let fallback = wire::join_path(&path, &folder.name);
                        entries.push(Entry::Folder(folder.into_entry(&fallback)));
                    }
                    TaggedMetadata::Deleted {} => debug!("Skipping deleted entry in {}", path),
                }
            }

            if !page.has_more {
                break;
            }

            debug!("Fetching next page of {}", path);
            page = self
                .transport
                .call(LIST_FOLDER_CONTINUE, &ListFolderContinueArg { cursor: &page.cursor })
                .await
                .map_err(at(&path))?;
        }

        Ok(Listing { path, entries })
    }

    // ==================== Folders ====================

    /// Create a folder, including missing intermediate folders
    #[instrument(skip(self))]
    pub async fn create_folder(&self, path: &str) -> Result<FolderEntry> {
        let path = normalize_path(path);
        if is_root(&path) {
            return Err(ClientError::Conflict {
                path,
                summary: "path/conflict/folder/".to_string(),
            });
        }

        let resp: CreateFolderResponse = self
            .transport
            .call(
                CREATE_FOLDER,
                &CreateFolderArg {
                    path: &path,
                    autorename: false,
                },
            )
            .await
            .map_err(at(&path))?;

        Ok(resp.metadata.into_entry(&path))
    }

    // ==================== Upload ====================

    /// Upload a local file to `remote_path`.
    ///
    /// Fails with a conflict rather than overwriting an existing entry.
    #[instrument(skip(self, source), fields(source = %source.as_ref().display()))]
    pub async fn upload(&self, source: impl AsRef<Path>, remote_path: &str) -> Result<FileEntry> {
        let remote_path = normalize_path(remote_path);

        let file = tokio::fs::File::open(source.as_ref()).await?;
        let length = file.metadata().await?.len();
        debug!("Uploading {} bytes to {}", length, remote_path);

        self.upload_body(&remote_path, file_body(file), length).await
    }

    /// Upload an in-memory buffer to `remote_path`
    #[instrument(skip(self, data))]
    pub async fn upload_bytes(
        &self,
        data: impl Into<Bytes>,
        remote_path: &str,
    ) -> Result<FileEntry> {
        let remote_path = normalize_path(remote_path);
        let (body, length) = bytes_body(data.into());

        self.upload_body(&remote_path, body, length).await
    }

    async fn upload_body(
        &self,
        remote_path: &str,
        body: reqwest::Body,
        length: u64,
    ) -> Result<FileEntry> {
        let meta: FileMetadata = self
            .transport
            .upload(UPLOAD, &UploadArg::add(remote_path), body, length)
            .await
            .map_err(at(remote_path))?;

        Ok(meta.into_entry(remote_path))
    }

    // ==================== Download ====================

    /// Download `remote_path` into a local file, creating or truncating it.
    ///
    /// The destination is opened before any request is sent.
    #[instrument(skip(self, destination), fields(destination = %destination.as_ref().display()))]
    pub async fn download(
        &self,
        remote_path: &str,
        destination: impl AsRef<Path>,
    ) -> Result<FileEntry> {
        let mut file = tokio::fs::File::create(destination.as_ref()).await?;
        self.download_to(remote_path, &mut file).await
    }

    /// Stream `remote_path` into `sink`, flushing it on every exit path.
    #[instrument(skip(self, sink))]
    pub async fn download_to(
        &self,
        remote_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<FileEntry> {
        let remote_path = normalize_path(remote_path);

        let (meta, response): (FileMetadata, Response) = self
            .transport
            .download(DOWNLOAD, &PathArg { path: &remote_path })
            .await
            .map_err(at(&remote_path))?;
        let entry = meta.into_entry(&remote_path);

        let copied = copy_body(response, sink).await;
        let flushed = sink.flush().await;

        let received = match (copied, flushed) {
            (Ok(received), Ok(())) => received,
            (Ok(_), Err(e)) => return Err(ClientError::Io(e)),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(flush_err)) => {
                warn!("Flushing sink after failed download of {} also failed: {}", remote_path, flush_err);
                return Err(e);
            }
        };

        if received != entry.size {
            return Err(ClientError::Network(TransportError::Truncated {
                expected: entry.size,
                received,
            }));
        }

        Ok(entry)
    }

    /// Download `remote_path` and decode it as UTF-8
    #[instrument(skip(self))]
    pub async fn download_as_string(&self, remote_path: &str) -> Result<String> {
        let mut buffer: Vec<u8> = Vec::new();
        self.download_to(remote_path, &mut buffer).await?;

        String::from_utf8(buffer)
            .map_err(|e| ClientError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    // ==================== Delete ====================

    /// Delete the entry at `remote_path`; folders are removed recursively
    #[instrument(skip(self))]
    pub async fn delete(&self, remote_path: &str) -> Result<()> {
        let remote_path = normalize_path(remote_path);

        let resp: DeleteResponse = self
            .transport
            .call(DELETE, &PathArg { path: &remote_path })
            .await
            .map_err(at(&remote_path))?;

        if let Some(entry) = resp.metadata.into_entry(&remote_path) {
            debug!("Deleted {}", entry.path());
        }
        Ok(())
    }
}

/// Translate transport failures for an operation on `path`
fn at(path: &str) -> impl Fn(TransportError) -> ClientError + '_ {
    move |err| ClientError::from_transport(err, path)
}

/// Copy a response body into `sink`, returning the number of bytes written
async fn copy_body(response: Response, sink: &mut (dyn AsyncWrite + Unpin + Send)) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut received = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ClientError::Network(TransportError::Body(e)))?;
        sink.write_all(&chunk).await?;
        received += chunk.len() as u64;
    }

    Ok(received)
}
