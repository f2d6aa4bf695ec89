use crate::error::EditorError;
use std::fmt;

/// Which silent branch produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    LoadRecord,
    LoadGenders,
    Update,
    Create,
    Delete,
    Upload,
    RejectedInput,
    Ignored,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadRecord => "load_record",
            Self::LoadGenders => "load_genders",
            Self::Update => "update",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::RejectedInput => "rejected_input",
            Self::Ignored => "ignored",
        };
        f.write_str(name)
    }
}

/// A failure the user is never shown, kept so it can still be observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub kind: DiagnosticKind,
    pub context: String,
    pub message: String,
}

impl DiagnosticEvent {
    pub fn new(kind: DiagnosticKind, context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn from_error(kind: DiagnosticKind, context: impl Into<String>, error: &EditorError) -> Self {
        Self::new(kind, context, format!("{} ({})", error, error.kind_name()))
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, event: DiagnosticEvent);
}

/// Writes every diagnostic to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        match event.kind {
            DiagnosticKind::Ignored | DiagnosticKind::RejectedInput => {
                warn!(kind = %event.kind, context = %event.context, message = %event.message, "editor diagnostic");
            }
            _ => {
                error!(kind = %event.kind, context = %event.context, message = %event.message, "editor diagnostic");
            }
        }
    }
}
