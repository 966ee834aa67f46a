//! Typed arguments for WebMerge operations.

use serde::Serialize;

/// Filters for listing documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Free-text search over document names.
    pub search: Option<String>,
    /// Restrict the listing to one folder.
    pub folder: Option<String>,
}

impl ListOptions {
    /// No filters; lists everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the folder to list.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

/// Flags for merging a document or data route.
///
/// The default (both `false`) is what the service assumes when the flags
/// are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Run the merge in test mode.
    pub test: bool,
    /// Return the merged file in the response instead of delivering it.
    pub download: bool,
}

impl MergeOptions {
    /// Both flags off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles test mode.
    pub fn test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// Toggles returning the merged file inline.
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }
}

/// Where the service should read a file from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSource {
    /// A publicly reachable URL.
    Url(String),
    /// Base64-encoded file contents.
    Contents(String),
}

/// A named file passed to the tools endpoints.
///
/// Serializes as `{"name": ..., "url": ...}` or `{"name": ..., "contents": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSpec {
    pub name: String,
    #[serde(flatten)]
    pub source: FileSource,
}

impl FileSpec {
    /// A file the service fetches from `url`.
    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Url(url.into()),
        }
    }

    /// A file sent inline as base64 `contents`.
    pub fn from_contents(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Contents(contents.into()),
        }
    }
}

/// Payload for combining several files into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineFiles {
    /// Output format, e.g. `"pdf"`.
    pub output: String,
    pub files: Vec<FileSpec>,
}

/// Payload for converting a single file to PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertToPdf {
    pub file: FileSpec,
}
