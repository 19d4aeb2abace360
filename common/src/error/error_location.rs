use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location as PanicLocation;

/// Source position attached to every error raised in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorLocation {
    pub const fn from(location: &'static PanicLocation<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }

    /// Capture the location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(PanicLocation::caller())
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}
