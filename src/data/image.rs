use crate::error::{EditorResult, NoFileSelectedSnafu, UnsupportedImageSnafu};
use infer::MatcherType;
use serde::{Deserialize, Serialize};
use snafu::OptionExt;

/// A file picked in the upload control.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The change event raised by the upload control. Only the first file is used.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    pub files: Vec<SelectedFile>,
}

impl FileInput {
    pub fn single(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            files: vec![SelectedFile {
                name: name.into(),
                bytes,
            }],
        }
    }

    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

impl ImageUpload {
    /// Takes the first selected file and sniffs its type from the bytes.
    pub fn from_input(input: &FileInput) -> EditorResult<Self> {
        let file = input.first().context(NoFileSelectedSnafu)?;
        let kind = infer::get(&file.bytes)
            .filter(|kind| kind.matcher_type() == MatcherType::Image)
            .context(UnsupportedImageSnafu {
                file_name: file.name.clone(),
            })?;

        Ok(Self {
            file_name: file.name.clone(),
            bytes: file.bytes.clone(),
            content_type: kind.mime_type().to_string(),
            extension: kind.extension().to_string(),
        })
    }
}

/// What the API hands back after storing a profile image.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadedImage {
    pub id: String,
    pub profile_image_url: String,
}

#[cfg(test)]
pub(crate) const PNG_HEADER: [u8; 16] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
];
