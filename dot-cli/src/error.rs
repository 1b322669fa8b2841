use dot_library::diag::{FileError, codespan_reporting};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    File(FileError),
    Json(serde_json::Error),
    Diagnostics(codespan_reporting::files::Error),
    /// Two templates would be packed into the same module.
    DuplicateStem {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },
    /// Failed with diagnostics that were already printed.
    Execution,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(err) => write!(f, "{err}"),
            CliError::File(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "invalid data: {err}"),
            CliError::Diagnostics(err) => write!(f, "failed to print diagnostics: {err}"),
            CliError::DuplicateStem { stem, first, second } => write!(
                f,
                "{} and {} would both be packed as `{stem}.js`",
                first.display(),
                second.display()
            ),
            CliError::Execution => write!(f, "compilation failed"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<FileError> for CliError {
    fn from(err: FileError) -> Self {
        CliError::File(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

impl From<codespan_reporting::files::Error> for CliError {
    fn from(err: codespan_reporting::files::Error) -> Self {
        CliError::Diagnostics(err)
    }
}
