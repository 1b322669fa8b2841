use crate::world::World;
use codespan_reporting::diagnostic::{Diagnostic, Label as CodespanLabel};
use codespan_reporting::files::{Error as FilesError, Files};
use codespan_reporting::term::termcolor::WriteColor;
use codespan_reporting::term::{self, Config};
use dot_error_codes::ErrorCode;
use dot_syntax::{FileId, Source, Span, SyntaxError};
use ecow::{EcoVec, eco_vec};
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::{fmt, io};

pub use codespan_reporting;

/// Early-return with a [`StrResult`] or [`SourceResult`].
///
/// If called with just a string and format args, returns with a
/// `StrResult`. If called with a span, a string and format args, returns
/// a `SourceResult`.
///
/// You can also emit hints with the `; hint: "..."` syntax.
///
/// ```ignore
/// bail!("bailing with a {}", "string result");
/// bail!(span, "bailing with a {}", "source result");
/// bail!(
///     span, "bailing with a {}", "source result";
///     hint: "hint 1"
/// );
/// ```
#[macro_export]
#[doc(hidden)]
macro_rules! __bail {
    // For bail!("just a {}", "string")
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::diag::error!($fmt $(, $arg)*))
    };

    // For bail!(error!(..))
    ($error:expr) => {
        return Err(::ecow::eco_vec![$error])
    };

    // For bail(span, ...)
    ($($tts:tt)*) => {
        return Err(::ecow::eco_vec![$crate::diag::error!($($tts)*)])
    };
}

/// Construct an [`EcoString`] or [`SourceDiagnostic`] with severity `Error`.
#[macro_export]
#[doc(hidden)]
macro_rules! __error {
    // For bail!("just a {}", "string").
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::diag::eco_format!($fmt, $($arg),*).into()
    };

    // For bail!(span, ...)
    (
        $span:expr, $fmt:literal $(, $arg:expr)*
        $(; hint: $hint:literal $(, $hint_arg:expr)*)*
        $(,)?
    ) => {
        $crate::diag::SourceDiagnostic::error(
            $span,
            $crate::diag::eco_format!($fmt, $($arg),*),
        )  $(.with_hint($crate::diag::eco_format!($hint, $($hint_arg),*)))*
    };
}

#[rustfmt::skip]
#[doc(inline)]
pub use {
    crate::__bail as bail,
    crate::__error as error,
    ecow::{eco_format, EcoString},
};

pub type SourceResult<T> = Result<T, EcoVec<SourceDiagnostic>>;
pub type StrResult<T> = Result<T, EcoString>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceDiagnostic {
    pub span: Span,
    pub message: EcoString,
    pub label_message: Option<EcoString>,
    pub code: Option<&'static ErrorCode>,
    pub trace: EcoVec<Spanned<TracePoint>>,
    pub hints: EcoVec<EcoString>,
    pub labels: EcoVec<Label>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Label {
    pub span: Span,
    pub message: EcoString,
}

impl Label {
    pub fn new(span: Span, message: impl Into<EcoString>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl SourceDiagnostic {
    pub fn error<S>(span: Span, message: S) -> Self
    where
        S: Into<EcoString>,
    {
        Self {
            span,
            message: message.into(),
            label_message: None,
            code: None,
            trace: eco_vec!(),
            hints: eco_vec!(),
            labels: eco_vec!(),
        }
    }

    pub fn with_label_message(mut self, message: impl Into<EcoString>) -> Self {
        self.label_message = Some(message.into());
        self
    }

    pub fn hint(&mut self, hint: impl Into<EcoString>) {
        self.hints.push(hint.into());
    }

    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint(hint);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<EcoString>) -> Self {
        self.labels.push(Label::new(span, message));
        self
    }

    pub fn with_code(mut self, code: &'static ErrorCode) -> Self {
        self.code = Some(code);
        self
    }
}

impl From<SyntaxError> for SourceDiagnostic {
    fn from(error: SyntaxError) -> Self {
        SourceDiagnostic {
            span: error.span,
            message: error.message,
            label_message: error.label_message,
            code: error.code,
            trace: eco_vec!(),
            hints: error.hints,
            labels: eco_vec!(),
        }
    }
}

impl Display for SourceDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "error[{}]: {}", code.code, self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

/// Converts the errors of a failed parse into diagnostics.
pub fn syntax_errors(errors: EcoVec<SyntaxError>) -> EcoVec<SourceDiagnostic> {
    errors.into_iter().map(SourceDiagnostic::from).collect()
}

pub trait Trace<T> {
    fn trace<F>(self, make_point: F, span: Span) -> Self
    where
        F: Fn() -> TracePoint;
}

impl<T> Trace<T> for SourceResult<T> {
    fn trace<F>(self, make_point: F, span: Span) -> Self
    where
        F: Fn() -> TracePoint,
    {
        self.map_err(|mut errors| {
            let trace_range = span.range();

            // Skip traces that are fully contained within the given span.
            for error in errors.make_mut().iter_mut() {
                match (error.span.range(), &trace_range) {
                    (Some(error_range), Some(trace_range))
                        if error.span.id() == span.id()
                            && trace_range.start <= error_range.start
                            && error_range.end <= trace_range.end => {}
                    _ => error.trace.push(Spanned::new(make_point(), span)),
                }
            }
            errors
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TracePoint {
    Call(Option<EcoString>),
    /// Evaluating the value of a `{{## name = ... #}}` define.
    Define(EcoString),
    /// Evaluating a `{{# ... }}` use site.
    Use(EcoString),
    /// Running a compiled template.
    Render,
}

impl Display for TracePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TracePoint::Call(Some(name)) => {
                write!(f, "error occurred in this call to `{}`", name)
            }
            TracePoint::Call(None) => {
                write!(f, "error occurred in this call")
            }
            TracePoint::Define(name) => {
                write!(f, "error occurred while evaluating the define `{}`", name)
            }
            TracePoint::Use(code) => {
                write!(f, "error occurred while expanding `{{{{#{}}}}}`", code)
            }
            TracePoint::Render => {
                write!(f, "error occurred while rendering the template")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

pub trait At<T> {
    fn at(self, span: Span) -> SourceResult<T>;
}

impl<T, S> At<T> for Result<T, S>
where
    S: Into<EcoString>,
{
    fn at(self, span: Span) -> SourceResult<T> {
        self.map_err(|msg| {
            let err = SourceDiagnostic::error(span, msg);
            eco_vec!(err)
        })
    }
}

/// Writes diagnostics to a terminal.
///
/// Diagnostics whose span points into a file the world does not know are
/// written without source snippets.
pub fn write_diagnostics(
    world: &dyn World,
    errors: &[SourceDiagnostic],
    writer: &mut dyn WriteColor,
    config: &Config,
) -> Result<(), FilesError> {
    let files = WorldFiles(world);

    for error in errors {
        let mut diagnostic = Diagnostic::error().with_message(error.message.clone());
        if let Some(code) = error.code {
            diagnostic = diagnostic.with_code(code.code);
        }

        let mut labels = vec![];
        if let Some(label) = label(world, error.span, |id, range| CodespanLabel::primary(id, range)) {
            let message = error.label_message.clone().unwrap_or_default();
            labels.push(label.with_message(message));
        }
        for extra in &error.labels {
            if let Some(label) = label(world, extra.span, |id, range| CodespanLabel::secondary(id, range)) {
                labels.push(label.with_message(extra.message.clone()));
            }
        }
        let mut notes = vec![];
        for point in &error.trace {
            match label(world, point.span, |id, range| CodespanLabel::secondary(id, range)) {
                Some(label) => labels.push(label.with_message(point.value.to_string())),
                None => notes.push(point.value.to_string()),
            }
        }
        notes.extend(error.hints.iter().map(|hint| format!("hint: {hint}")));

        let diagnostic = diagnostic.with_labels(labels).with_notes(notes);
        term::emit(writer, config, &files, &diagnostic)?;
    }

    Ok(())
}

fn label(
    world: &dyn World,
    span: Span,
    make: fn(FileId, Range<usize>) -> CodespanLabel<FileId>,
) -> Option<CodespanLabel<FileId>> {
    let id = span.id()?;
    let range = span.range()?;
    world.source(id).ok()?;
    Some(make(id, range))
}

struct WorldFiles<'w>(&'w dyn World);

impl<'a> Files<'a> for WorldFiles<'_> {
    type FileId = FileId;
    type Name = String;
    type Source = Source;

    fn name(&'a self, id: FileId) -> Result<String, FilesError> {
        Ok(id.path().display())
    }

    fn source(&'a self, id: FileId) -> Result<Source, FilesError> {
        self.0.source(id).map_err(|_| FilesError::FileMissing)
    }

    fn line_index(&'a self, id: FileId, byte_index: usize) -> Result<usize, FilesError> {
        let source = Files::source(self, id)?;
        Ok(source
            .line_starts()
            .binary_search(&byte_index)
            .unwrap_or_else(|next_line| next_line - 1))
    }

    fn line_range(&'a self, id: FileId, line_index: usize) -> Result<Range<usize>, FilesError> {
        let source = Files::source(self, id)?;
        source
            .line_range(line_index)
            .ok_or(FilesError::LineTooLarge {
                given: line_index,
                max: source.line_starts().len(),
            })
    }
}

/// A result type with a file-related error.
pub type FileResult<T> = Result<T, FileError>;

/// An error that occurred while trying to load of a file.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum FileError {
    /// A file was not found at this path.
    NotFound(PathBuf),
    /// A file could not be accessed.
    AccessDenied,
    /// The file was not valid UTF-8, but should have been.
    InvalidUtf8,
    /// Another error.
    ///
    /// The optional string can give more details, if available.
    Other(Option<EcoString>),
}

impl FileError {
    /// Create a file error from an I/O error.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.into()),
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            io::ErrorKind::InvalidData
                if err.to_string().contains("stream did not contain valid UTF-8") =>
            {
                Self::InvalidUtf8
            }
            _ => Self::Other(Some(eco_format!("{err}"))),
        }
    }
}

impl std::error::Error for FileError {}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "file not found (searched at {})", path.display())
            }
            Self::AccessDenied => f.pad("failed to load file (access denied)"),
            Self::InvalidUtf8 => f.pad("file is not valid utf-8"),
            Self::Other(Some(err)) => write!(f, "failed to load file ({err})"),
            Self::Other(None) => f.pad("failed to load file"),
        }
    }
}

impl From<FileError> for EcoString {
    fn from(err: FileError) -> Self {
        eco_format!("{err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SourceMap;
    use codespan_reporting::term::termcolor::NoColor;

    fn render(world: &SourceMap, errors: &[SourceDiagnostic]) -> String {
        let mut buffer = NoColor::new(vec![]);
        write_diagnostics(world, errors, &mut buffer, &Config::default()).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_bail_with_span() {
        fn fails(span: Span) -> SourceResult<()> {
            bail!(span, "broken {}", 42; hint: "try {}", "again");
        }
        let errors = fails(Span::detached()).unwrap_err();
        assert_eq!(errors[0].message, "broken 42");
        assert_eq!(errors[0].hints[0], "try again");
    }

    #[test]
    fn test_at_attaches_span() {
        let source = Source::from_string("at.dot", "abc");
        let span = Span::new(source.id(), 1..2);
        let result: StrResult<()> = Err("nope".into());
        let errors = result.at(span).unwrap_err();
        assert_eq!(errors[0].span, span);
    }

    #[test]
    fn test_trace_skips_contained_errors() {
        let source = Source::from_string("trace.dot", "0123456789");
        let outer = Span::new(source.id(), 0..10);
        let inner = Span::new(source.id(), 2..4);

        let result: SourceResult<()> = Err(eco_vec![SourceDiagnostic::error(inner, "x")]);
        let errors = result.trace(|| TracePoint::Render, outer).unwrap_err();
        assert!(errors[0].trace.is_empty());

        let result: SourceResult<()> = Err(eco_vec![SourceDiagnostic::error(outer, "x")]);
        let errors = result.trace(|| TracePoint::Render, inner).unwrap_err();
        assert_eq!(errors[0].trace[0].value, TracePoint::Render);
    }

    #[test]
    fn test_write_diagnostics_with_and_without_source() {
        let source = Source::from_string("diag.dot", "let x = ;");
        let mut world = SourceMap::new();
        world.insert(source.clone());

        let known = SourceDiagnostic::error(Span::new(source.id(), 8..9), "expected expression")
            .with_code(&dot_error_codes::E0004_EXPECTED_EXPRESSION);
        let output = render(&world, &[known]);
        assert!(output.contains("error[E0004]: expected expression"));
        assert!(output.contains("diag.dot"));

        let unknown = Source::from_string("elsewhere.dot", "x");
        let detached = SourceDiagnostic::error(Span::new(unknown.id(), 0..1), "lost")
            .with_hint("still reported");
        let output = render(&world, &[detached]);
        assert!(output.contains("error: lost"));
        assert!(output.contains("hint: still reported"));
    }
}
