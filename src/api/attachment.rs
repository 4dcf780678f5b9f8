//! Local image files attached to a review draft.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::error::ReviewError;

/// An image read into memory, ready to be uploaded to the image host.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    file_name: String,
    content_type: Option<&'static str>,
    bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Creates an attachment from in-memory bytes.
    ///
    /// The content type is guessed from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name: String = file_name.into();
        let content_type = guess_content_type(Utf8Path::new(&name));
        Self {
            file_name: name,
            content_type,
            bytes,
        }
    }

    /// Reads an image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Io`] when the path has no file name or the file
    /// cannot be read.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ReviewError> {
        let file_name = path.file_name().ok_or_else(|| ReviewError::Io {
            message: format!("invalid image path '{path}': no file name"),
        })?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };

        let dir = Dir::open_ambient_dir(&parent, ambient_authority()).map_err(|error| {
            ReviewError::Io {
                message: format!("failed to open image directory '{parent}': {error}"),
            }
        })?;
        let bytes = dir.read(file_name).map_err(|error| ReviewError::Io {
            message: format!("failed to read image '{path}': {error}"),
        })?;

        Ok(Self::new(file_name, bytes))
    }

    /// File name sent with the upload.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// MIME type guessed from the extension, if recognised.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Size of the image in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true when the image has no content.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(path: &Utf8Path) -> Option<&'static str> {
    let extension = path.extension()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
