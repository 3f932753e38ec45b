//! Common types for the client SDK

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote object: either a file or a folder
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    File(FileEntry),
    Folder(FolderEntry),
}

impl Entry {
    /// Normalized remote path
    pub fn path(&self) -> &str {
        match self {
            Self::File(f) => &f.path,
            Self::Folder(f) => &f.path,
        }
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Folder(f) => &f.name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Self::File(f) => Some(f),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderEntry> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }
}

impl From<FileEntry> for Entry {
    fn from(file: FileEntry) -> Self {
        Self::File(file)
    }
}

impl From<FolderEntry> for Entry {
    fn from(folder: FolderEntry) -> Self {
        Self::Folder(folder)
    }
}

/// A remote file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Normalized path, e.g. `/Photos/trip.jpg`
    pub path: String,
    /// File name
    pub name: String,
    /// Server-assigned identifier
    pub id: Option<String>,
    /// Size in bytes
    pub size: u64,
    /// Server-assigned revision
    pub revision: String,
    /// Dropbox content hash
    pub content_hash: Option<String>,
    /// Modification time reported by the uploading client
    pub client_modified: Option<DateTime<Utc>>,
    /// Last time the server saw a change
    pub server_modified: Option<DateTime<Utc>>,
}

/// A remote folder
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Normalized path, `/` for the root
    pub path: String,
    /// Folder name, empty for the root
    pub name: String,
    /// Server-assigned identifier
    pub id: Option<String>,
}

impl FolderEntry {
    /// The root folder
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            name: String::new(),
            id: None,
        }
    }
}

/// Immediate children of a folder, in server order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Normalized path of the listed folder
    pub path: String,
    /// Children
    pub entries: Vec<Entry>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Files only
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter_map(Entry::as_file)
    }

    /// Folders only
    pub fn folders(&self) -> impl Iterator<Item = &FolderEntry> {
        self.entries.iter().filter_map(Entry::as_folder)
    }
}

impl IntoIterator for Listing {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Identity of the authenticated account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account identifier, `dbid:...`
    pub account_id: String,
    /// Display name
    pub display_name: String,
    /// Email address
    pub email: String,
    /// Whether the email has been verified
    pub email_verified: bool,
    /// ISO 3166-1 country code
    pub country: Option<String>,
    /// IETF language tag
    pub locale: Option<String>,
}
