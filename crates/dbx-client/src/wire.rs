//! Dropbox API v2 request arguments and response bodies
//!
//! Everything vendor-shaped lives here and is mapped into the crate's own
//! [`Entry`]/[`AccountInfo`] types at this boundary.

use crate::path::{file_name, normalize_path};
use crate::types::{AccountInfo, Entry, FileEntry, FolderEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const GET_CURRENT_ACCOUNT: &str = "users/get_current_account";
pub(crate) const GET_METADATA: &str = "files/get_metadata";
pub(crate) const LIST_FOLDER: &str = "files/list_folder";
pub(crate) const LIST_FOLDER_CONTINUE: &str = "files/list_folder/continue";
pub(crate) const CREATE_FOLDER: &str = "files/create_folder_v2";
pub(crate) const UPLOAD: &str = "files/upload";
pub(crate) const DOWNLOAD: &str = "files/download";
pub(crate) const DELETE: &str = "files/delete_v2";

// ==================== Arguments ====================

#[derive(Debug, Serialize)]
pub(crate) struct PathArg<'a> {
    pub path: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListFolderArg<'a> {
    pub path: &'a str,
    pub recursive: bool,
    pub include_deleted: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListFolderContinueArg<'a> {
    pub cursor: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFolderArg<'a> {
    pub path: &'a str,
    pub autorename: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadArg<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    pub autorename: bool,
    pub mute: bool,
    pub strict_conflict: bool,
}

impl<'a> UploadArg<'a> {
    /// Write mode `add`: never overwrite, never rename
    pub fn add(path: &'a str) -> Self {
        Self {
            path,
            mode: "add",
            autorename: false,
            mute: false,
            strict_conflict: false,
        }
    }
}

// ==================== Responses ====================

/// Metadata carrying a `.tag` discriminator
#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub(crate) enum TaggedMetadata {
    File(FileMetadata),
    Folder(FolderMetadata),
    Deleted {},
}

impl TaggedMetadata {
    /// Map into an [`Entry`]; deleted placeholders have no entry.
    pub fn into_entry(self, fallback_path: &str) -> Option<Entry> {
        match self {
            Self::File(file) => Some(Entry::File(file.into_entry(fallback_path))),
            Self::Folder(folder) => Some(Entry::Folder(folder.into_entry(fallback_path))),
            Self::Deleted {} => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileMetadata {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
    pub rev: String,
    pub size: u64,
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub client_modified: Option<String>,
    #[serde(default)]
    pub server_modified: Option<String>,
}

impl FileMetadata {
    pub fn into_entry(self, fallback_path: &str) -> FileEntry {
        let path = entry_path(self.path_display.as_deref(), fallback_path);
        FileEntry {
            name: entry_name(self.name, &path),
            path,
            id: self.id,
            size: self.size,
            revision: self.rev,
            content_hash: self.content_hash,
            client_modified: self.client_modified.as_deref().and_then(parse_timestamp),
            server_modified: self.server_modified.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FolderMetadata {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
}

impl FolderMetadata {
    pub fn into_entry(self, fallback_path: &str) -> FolderEntry {
        let path = entry_path(self.path_display.as_deref(), fallback_path);
        FolderEntry {
            name: entry_name(self.name, &path),
            path,
            id: self.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListFolderResponse {
    pub entries: Vec<TaggedMetadata>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateFolderResponse {
    pub metadata: FolderMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteResponse {
    pub metadata: TaggedMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountResponse {
    pub account_id: String,
    pub name: AccountName,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountName {
    pub display_name: String,
}

impl From<AccountResponse> for AccountInfo {
    fn from(resp: AccountResponse) -> Self {
        Self {
            account_id: resp.account_id,
            display_name: resp.name.display_name,
            email: resp.email,
            email_verified: resp.email_verified,
            country: resp.country,
            locale: resp.locale,
        }
    }
}

/// Join a child name onto a normalized parent path
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    normalize_path(&format!("{}/{}", parent, name))
}

fn entry_path(path_display: Option<&str>, fallback: &str) -> String {
    match path_display {
        Some(p) if !p.is_empty() => normalize_path(p),
        _ => normalize_path(fallback),
    }
}

fn entry_name(name: String, path: &str) -> String {
    if name.is_empty() {
        file_name(path).to_string()
    } else {
        name
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_file() {
        let json = r#"{
            ".tag": "file",
            "name": "Prime_Numbers.txt",
            "id": "id:a4ayc_80_OEAAAAAAAAAXw",
            "client_modified": "2015-05-12T15:50:38Z",
            "server_modified": "2015-05-12T15:50:38Z",
            "rev": "a1c10ce0dd78",
            "size": 7212,
            "path_lower": "/homework/math/prime_numbers.txt",
            "path_display": "/Homework/math/Prime_Numbers.txt",
            "is_downloadable": true,
            "content_hash": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        }"#;

        let meta: TaggedMetadata = serde_json::from_str(json).unwrap();
        let entry = meta.into_entry("/ignored").unwrap();

        let file = entry.as_file().unwrap();
        assert_eq!(file.path, "/Homework/math/Prime_Numbers.txt");
        assert_eq!(file.name, "Prime_Numbers.txt");
        assert_eq!(file.size, 7212);
        assert_eq!(file.revision, "a1c10ce0dd78");
        assert!(file.server_modified.is_some());
    }

    #[test]
    fn test_parse_tagged_folder_without_path() {
        let json = r#"{".tag": "folder", "name": "math", "id": "id:a4ayc_80_OEAAAAAAAAAXz"}"#;
        let meta: TaggedMetadata = serde_json::from_str(json).unwrap();

        let entry = meta.into_entry("/Homework/math").unwrap();
        assert!(entry.is_folder());
        assert_eq!(entry.path(), "/Homework/math");
    }

    #[test]
    fn test_deleted_has_no_entry() {
        let json = r#"{".tag": "deleted", "name": "old.txt", "path_display": "/old.txt"}"#;
        let meta: TaggedMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.into_entry("/old.txt").is_none());
    }

    #[test]
    fn test_parse_account() {
        let json = r#"{
            "account_id": "dbid:AAH4f99T0taONIb-OurWxbNQ6ywGRopQngc",
            "name": {"given_name": "Franz", "surname": "Ferdinand", "familiar_name": "Franz", "display_name": "Franz Ferdinand (Personal)", "abbreviated_name": "FF"},
            "email": "franz@dropbox.com",
            "email_verified": true,
            "disabled": false,
            "locale": "en",
            "country": "US",
            "is_paired": false
        }"#;

        let resp: AccountResponse = serde_json::from_str(json).unwrap();
        let info = AccountInfo::from(resp);
        assert_eq!(info.display_name, "Franz Ferdinand (Personal)");
        assert_eq!(info.country.as_deref(), Some("US"));
        assert!(info.email_verified);
    }

    #[test]
    fn test_upload_arg_add_mode() {
        let json = serde_json::to_value(UploadArg::add("/a.txt")).unwrap();
        assert_eq!(json["mode"], "add");
        assert_eq!(json["autorename"], false);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
    }
}
