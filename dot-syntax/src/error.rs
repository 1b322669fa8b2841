use crate::span::Span;
use dot_error_codes::ErrorCode;
use ecow::{EcoString, EcoVec, eco_vec};

/// An error found while lexing or parsing embedded code.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SyntaxError {
    /// The offending span.
    pub span: Span,
    /// The error message.
    pub message: EcoString,
    /// Additional hints to the user, indicating how this error could be avoided
    /// or worked around.
    pub hints: EcoVec<EcoString>,
    /// A message to be displayed as a label for the error. This message is
    /// shown at the location of the error and can give more locational
    /// information
    pub label_message: Option<EcoString>,
    pub code: Option<&'static ErrorCode>,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<EcoString>, span: Span) -> SyntaxError {
        SyntaxError {
            span,
            message: message.into(),
            hints: eco_vec![],
            label_message: None,
            code: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_label_message(mut self, message: impl Into<EcoString>) -> Self {
        self.label_message = Some(message.into());
        self
    }

    pub fn with_code(mut self, code: &'static ErrorCode) -> Self {
        self.code = Some(code);
        self
    }
}
