use crate::editor::phase::{EditorPhase, PhaseEvent};
use snafu::Snafu;
use std::num::ParseIntError;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EditorError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse {} from {:?}", name, original))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
        original: String,
    },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Unable to find gender with ID: {}", id))]
    MissingGender { id: String },
    #[snafu(display("Unknown student field {:?}", name))]
    UnknownField { name: String },
    #[snafu(display("No file was selected for upload"))]
    NoFileSelected,
    #[snafu(display("{:?} is not a recognised image", file_name))]
    UnsupportedImage { file_name: String },
    #[snafu(display("Student API unavailable: {}", reason))]
    ApiUnavailable { reason: String },
    #[snafu(display("Tried to go from {:?} using {:?}", from, event))]
    InvalidTransition {
        from: EditorPhase,
        event: PhaseEvent,
    },
    #[snafu(display("Error reading input"))]
    Io { source: std::io::Error },
    #[snafu(display("Error with JSON"))]
    Json { source: serde_json::Error },
}

impl EditorError {
    /// Short label used when the error is forwarded to a diagnostic sink.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } => "config",
            Self::MissingStudent { .. } | Self::MissingGender { .. } => "not_found",
            Self::UnknownField { .. } => "bad_field",
            Self::NoFileSelected | Self::UnsupportedImage { .. } => "bad_upload",
            Self::ApiUnavailable { .. } => "unavailable",
            Self::InvalidTransition { .. } => "transition",
            Self::Io { .. } | Self::Json { .. } => "io",
        }
    }
}
