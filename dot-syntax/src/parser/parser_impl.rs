use crate::error::SyntaxError;
use crate::file::FileId;
use crate::kind::SyntaxKind;
use crate::lexer::{Lexer, Token};
use crate::set::SyntaxSet;
use crate::span::Span;
use dot_error_codes::{E0001_UNCLOSED_DELIMITER, E0003_UNEXPECTED_TOKEN};
use dot_utils::trace_fn;
use ecow::{EcoVec, eco_format};

pub(crate) type PResult<T> = Result<T, SyntaxError>;

/// A recursive descent parser for dot script.
///
/// Errors inside a statement abort that statement and are collected; parsing
/// resumes at the next statement boundary so one run reports every broken
/// statement.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'s> {
    lexer: Lexer<'s>,
    /// Current token
    pub(crate) token: Token<'s>,
    /// Span of the last eaten token.
    prev_span: Span,
    pub(crate) errors: EcoVec<SyntaxError>,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(text: &'s str, file_id: FileId, offset: usize) -> Self {
        let mut errors = EcoVec::new();
        let mut lexer = Lexer::with_offset(text, file_id, offset);
        let token = Self::lex(&mut lexer, &mut errors);

        Self {
            lexer,
            token,
            prev_span: Span::new(file_id, offset..offset),
            errors,
        }
    }

    pub(crate) fn file_id(&self) -> FileId {
        self.lexer.file_id()
    }

    #[inline]
    pub(crate) fn current(&self) -> SyntaxKind {
        self.token.kind
    }

    pub(crate) fn current_text(&self) -> &'s str {
        self.token.text
    }

    pub(crate) fn current_span(&self) -> Span {
        self.token.span
    }

    /// A copy of the lexer positioned after the current token.
    pub(crate) fn lookahead(&self) -> Lexer<'s> {
        self.lexer.clone()
    }

    /// Peeks the token kind after current
    pub(crate) fn peek(&self) -> SyntaxKind {
        self.lexer.clone().next().kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_set(&self, set: SyntaxSet) -> bool {
        set.contains(self.current())
    }

    pub(crate) fn end(&self) -> bool {
        self.at(SyntaxKind::End)
    }

    /// Consumes the current token and returns it.
    pub(crate) fn eat(&mut self) -> Token<'s> {
        let next = Self::lex(&mut self.lexer, &mut self.errors);
        let token = std::mem::replace(&mut self.token, next);
        self.prev_span = token.span;
        token
    }

    pub(crate) fn eat_if(&mut self, kind: SyntaxKind) -> bool {
        let at = self.at(kind);
        if at {
            self.eat();
        }
        at
    }

    /// Consume the given syntax kind or produce an error.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> PResult<Token<'s>> {
        if self.at(kind) {
            return Ok(self.eat());
        }
        Err(self.expected(kind.descriptive_name()))
    }

    /// Expects the closing delimiter of a group opened at `open`.
    pub(crate) fn expect_closing(&mut self, kind: SyntaxKind, open: Span) -> PResult<Token<'s>> {
        if self.at(kind) {
            return Ok(self.eat());
        }
        let error = if self.end() {
            SyntaxError::new("unclosed delimiter", open)
                .with_code(&E0001_UNCLOSED_DELIMITER)
                .with_label_message(eco_format!("this is never closed by {}", kind.descriptive_name()))
        } else {
            self.expected(kind.descriptive_name())
        };
        Err(error)
    }

    /// An error at the current token saying that `expected` was expected.
    pub(crate) fn expected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            eco_format!("expected {expected}, found {}", self.current().descriptive_name()),
            self.current_span(),
        )
        .with_code(&E0003_UNEXPECTED_TOKEN)
    }

    /// The span from `start` up to the last eaten token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        Span::join(start, self.prev_span)
    }

    /// Records `error` and skips tokens until one in `recover_set`.
    ///
    /// Always makes progress, so callers looping over statements terminate.
    pub(crate) fn recover(&mut self, error: SyntaxError, recover_set: SyntaxSet) {
        trace_fn!("parser_recover", "{}", error.message);
        self.errors.push(error);

        let start = self.current_span();
        while !self.at_set(recover_set) {
            self.eat();
        }
        if self.current_span() == start && !self.end() {
            self.eat();
        } else {
            self.eat_if(SyntaxKind::Semicolon);
        }
    }

    fn lex(lexer: &mut Lexer<'s>, errors: &mut EcoVec<SyntaxError>) -> Token<'s> {
        loop {
            let mut token = lexer.next();
            match token.error.take() {
                Some(error) => errors.push(error),
                None => return token,
            }
        }
    }
}
