use crate::error::SyntaxError;
use crate::file::FileId;
use crate::kind::SyntaxKind;
use crate::span::Span;
use dot_error_codes::E0001_UNCLOSED_DELIMITER;
use ecow::EcoString;
use std::ops::Range;
use unscanny::Scanner;

/// A single token of dot script.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'s> {
    pub kind: SyntaxKind,
    pub text: &'s str,
    pub span: Span,
    pub error: Option<SyntaxError>,
}

/// One piece of a template literal, as a byte range into the literal's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePiece {
    /// Literal text, still escaped.
    Text(Range<usize>),
    /// The code inside a `${ }` slot.
    Code(Range<usize>),
}

#[derive(Debug, Clone)]
pub struct Lexer<'s> {
    /// Scanner: Contains the source text and a cursor in the source text
    s: Scanner<'s>,
    error: Option<SyntaxError>,
    file_id: FileId,
    /// Added to every span, for lexers over a slice of a larger source.
    offset: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(text: &'s str, file_id: FileId) -> Self {
        Self::with_offset(text, file_id, 0)
    }

    pub fn with_offset(text: &'s str, file_id: FileId, offset: usize) -> Self {
        Self {
            s: Scanner::new(text),
            error: None,
            file_id,
            offset,
        }
    }

    /// The index in the string at which the last token ended and the next token will start
    pub fn cursor(&self) -> usize {
        self.s.cursor()
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Lexer<'_> {
    fn error(&mut self, message: impl Into<EcoString>, range: Range<usize>) -> SyntaxKind {
        self.error = Some(SyntaxError::new(message, self.span(range)));
        SyntaxKind::Error
    }

    fn span(&self, range: Range<usize>) -> Span {
        Span::new(
            self.file_id,
            range.start + self.offset..range.end + self.offset,
        )
    }

    /// Create a range from the start of the string to the current cursor.
    fn range_from(&self, start: usize) -> Range<usize> {
        start..self.s.cursor()
    }
}

impl<'s> Lexer<'s> {
    /// Produces the next token that is not a comment.
    pub fn next(&mut self) -> Token<'s> {
        loop {
            let token = self.next_raw();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    fn next_raw(&mut self) -> Token<'s> {
        debug_assert!(self.error.is_none());

        self.s.eat_whitespace();
        let start = self.cursor();

        let kind = match self.s.eat() {
            Some(c) => self.kind(start, c),
            None => SyntaxKind::End,
        };

        Token {
            kind,
            text: self.s.from(start),
            span: self.span(self.range_from(start)),
            error: self.error.take(),
        }
    }

    fn kind(&mut self, start: usize, c: char) -> SyntaxKind {
        match c {
            '/' if self.s.eat_if('/') => {
                self.s.eat_until(is_newline);
                SyntaxKind::Comment
            }
            '/' if self.s.eat_if('*') => self.lex_block_comment(start),

            '=' if self.s.eat_if("==") => SyntaxKind::EqEqEq,
            '=' if self.s.eat_if('=') => SyntaxKind::EqEq,
            '=' if self.s.eat_if('>') => SyntaxKind::Arrow,
            '!' if self.s.eat_if("==") => SyntaxKind::BangEqEq,
            '!' if self.s.eat_if('=') => SyntaxKind::BangEq,
            '+' if self.s.eat_if('+') => SyntaxKind::PlusPlus,
            '+' if self.s.eat_if('=') => SyntaxKind::PlusEq,
            '-' if self.s.eat_if('-') => SyntaxKind::MinusMinus,
            '-' if self.s.eat_if('=') => SyntaxKind::MinusEq,
            '*' if self.s.eat_if('=') => SyntaxKind::StarEq,
            '/' if self.s.eat_if('=') => SyntaxKind::SlashEq,
            '%' if self.s.eat_if('=') => SyntaxKind::PercentEq,
            '<' if self.s.eat_if('=') => SyntaxKind::LtEq,
            '>' if self.s.eat_if('=') => SyntaxKind::GtEq,
            '&' if self.s.eat_if('&') => SyntaxKind::AmpAmp,
            '|' if self.s.eat_if('|') => SyntaxKind::PipePipe,
            '?' if self.s.eat_if('?') => SyntaxKind::QuestionQuestion,

            '{' => SyntaxKind::LeftBrace,
            '}' => SyntaxKind::RightBrace,
            '[' => SyntaxKind::LeftBracket,
            ']' => SyntaxKind::RightBracket,
            '(' => SyntaxKind::LeftParen,
            ')' => SyntaxKind::RightParen,

            '.' if self.s.at(char::is_ascii_digit) => self.lex_number(start),
            '.' => SyntaxKind::Dot,
            ',' => SyntaxKind::Comma,
            ';' => SyntaxKind::Semicolon,
            ':' => SyntaxKind::Colon,
            '?' => SyntaxKind::Question,
            '*' => SyntaxKind::Star,
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '/' => SyntaxKind::Slash,
            '%' => SyntaxKind::Percent,
            '!' => SyntaxKind::Bang,
            '>' => SyntaxKind::Gt,
            '<' => SyntaxKind::Lt,
            '=' => SyntaxKind::Eq,

            '"' | '\'' => self.lex_string(start, c),
            '`' => self.lex_template(start),
            '0'..='9' => self.lex_number(start),

            c if is_ident_start(c) => self.lex_ident(start),

            c => self.error(
                format!("unexpected character `{c}`"),
                self.range_from(start),
            ),
        }
    }

    fn lex_number(&mut self, start: usize) -> SyntaxKind {
        self.s.eat_while(char::is_ascii_digit);

        if self.s.at('.') {
            self.s.eat();
            self.s.eat_while(char::is_ascii_digit);
        }

        let exponent = matches!(self.s.peek(), Some('e' | 'E'))
            && matches!(self.s.scout(1), Some('0'..='9' | '+' | '-'));
        if exponent {
            self.s.eat();
            self.s.eat_if(['+', '-']);
            self.s.eat_while(char::is_ascii_digit);
        }

        let number = self.s.from(start);
        if number.parse::<f64>().is_ok() {
            SyntaxKind::Number
        } else {
            self.error(format!("invalid number `{number}`"), self.range_from(start))
        }
    }

    fn lex_ident(&mut self, start: usize) -> SyntaxKind {
        self.s.eat_while(is_ident_mid);
        let ident = self.s.from(start);

        // `a.if` is a property access, not a keyword.
        let prev = self.s.get(0..start).trim_end();
        if !prev.ends_with('.') {
            if let Some(keyword) = keyword(ident) {
                return keyword;
            }
        }

        SyntaxKind::Ident
    }

    fn lex_string(&mut self, start: usize, quote: char) -> SyntaxKind {
        let mut escaped = false;
        self.s.eat_until(|c| {
            let stop = (c == quote || is_newline(c)) && !escaped;
            escaped = c == '\\' && !escaped;
            stop
        });

        if !self.s.eat_if(quote) {
            self.error("unclosed string", self.range_from(start));
            self.hint_code();
            return SyntaxKind::Error;
        }

        SyntaxKind::Str
    }

    fn lex_template(&mut self, start: usize) -> SyntaxKind {
        if scan_template(&mut self.s).is_none() {
            self.error("unclosed template literal", self.range_from(start));
            self.hint_code();
            return SyntaxKind::Error;
        }
        SyntaxKind::Template
    }

    fn lex_block_comment(&mut self, start: usize) -> SyntaxKind {
        while let Some(c) = self.s.eat() {
            if c == '*' && self.s.eat_if('/') {
                return SyntaxKind::Comment;
            }
        }
        self.error("unterminated block comment", self.range_from(start));
        self.hint_code();
        SyntaxKind::Error
    }

    fn hint_code(&mut self) {
        if let Some(error) = self.error.take() {
            self.error = Some(error.with_code(&E0001_UNCLOSED_DELIMITER));
        }
    }
}

/// Splits the text of a template literal token (backticks included) into its pieces.
///
/// Returns `None` when the literal is not terminated.
pub fn template_pieces(text: &str) -> Option<Vec<TemplatePiece>> {
    let mut s = Scanner::new(text);
    if !s.eat_if('`') {
        return None;
    }
    scan_template(&mut s)
}

/// Scans the rest of a template literal whose opening backtick was already eaten.
fn scan_template(s: &mut Scanner) -> Option<Vec<TemplatePiece>> {
    let mut pieces = vec![];
    let mut text_start = s.cursor();

    loop {
        let here = s.cursor();
        match s.eat()? {
            '\\' => {
                s.eat();
            }
            '`' => {
                pieces.push(TemplatePiece::Text(text_start..here));
                return Some(pieces);
            }
            '$' if s.eat_if('{') => {
                pieces.push(TemplatePiece::Text(text_start..here));
                let code_start = s.cursor();
                scan_code_slot(s)?;
                pieces.push(TemplatePiece::Code(code_start..s.cursor() - 1));
                text_start = s.cursor();
            }
            _ => {}
        }
    }
}

/// Eats code up to and including the `}` that closes a `${` slot.
fn scan_code_slot(s: &mut Scanner) -> Option<()> {
    let mut depth = 0usize;
    loop {
        match s.eat()? {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(()),
            '}' => depth -= 1,
            '`' => {
                scan_template(s)?;
            }
            quote @ ('"' | '\'') => {
                let mut escaped = false;
                s.eat_until(|c| {
                    let stop = c == quote && !escaped;
                    escaped = c == '\\' && !escaped;
                    stop
                });
                if !s.eat_if(quote) {
                    return None;
                }
            }
            '/' if s.eat_if('*') => loop {
                if s.eat()? == '*' && s.eat_if('/') {
                    break;
                }
            },
            _ => {}
        }
    }
}

/// Whether a character is interpreted as a newline
#[inline]
pub fn is_newline(character: char) -> bool {
    matches!(
        character,
        '\n' | '\x0B' | '\x0C' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn keyword(ident: &str) -> Option<SyntaxKind> {
    Some(match ident {
        "break" => SyntaxKind::Break,
        "const" => SyntaxKind::Const,
        "continue" => SyntaxKind::Continue,
        "else" => SyntaxKind::Else,
        "false" => SyntaxKind::False,
        "for" => SyntaxKind::For,
        "function" => SyntaxKind::Function,
        "if" => SyntaxKind::If,
        "let" => SyntaxKind::Let,
        "null" => SyntaxKind::Null,
        "return" => SyntaxKind::Return,
        "true" => SyntaxKind::True,
        "typeof" => SyntaxKind::Typeof,
        "var" => SyntaxKind::Var,
        "while" => SyntaxKind::While,
        _ => return None,
    })
}

pub fn is_ident_mid(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_file_id;
    use extension_traits::extension;

    #[extension(trait LexerAssert)]
    impl Lexer<'_> {
        #[track_caller]
        fn assert_next(&mut self, kind: SyntaxKind, text: &str, range: Range<usize>) {
            let token = self.next();
            assert_eq!(token.error, None, "unexpected error token");
            assert_eq!(
                (token.kind, token.text, token.span),
                (kind, text, Span::new(self.file_id, range))
            );
        }

        #[track_caller]
        fn assert_next_error(&mut self, message: &str, range: Range<usize>) {
            let token = self.next();
            assert_eq!(token.kind, SyntaxKind::Error);
            let error = token.error.expect("error tokens carry an error");
            assert_eq!(error.message, message);
            assert_eq!(error.span, Span::new(self.file_id, range));
        }

        #[track_caller]
        fn assert_end(&mut self, index: usize) {
            self.assert_next(SyntaxKind::End, "", index..index);
        }
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("123 4.5 1e3 .5", test_file_id());
        lexer.assert_next(SyntaxKind::Number, "123", 0..3);
        lexer.assert_next(SyntaxKind::Number, "4.5", 4..7);
        lexer.assert_next(SyntaxKind::Number, "1e3", 8..11);
        lexer.assert_next(SyntaxKind::Number, ".5", 12..14);
        lexer.assert_end(14);
    }

    #[test]
    fn test_member_access() {
        let mut lexer = Lexer::new("it.foo", test_file_id());
        lexer.assert_next(SyntaxKind::Ident, "it", 0..2);
        lexer.assert_next(SyntaxKind::Dot, ".", 2..3);
        lexer.assert_next(SyntaxKind::Ident, "foo", 3..6);
        lexer.assert_end(6);
    }

    #[test]
    fn test_keyword_after_dot_is_ident() {
        let mut lexer = Lexer::new("a.if", test_file_id());
        lexer.assert_next(SyntaxKind::Ident, "a", 0..1);
        lexer.assert_next(SyntaxKind::Dot, ".", 1..2);
        lexer.assert_next(SyntaxKind::Ident, "if", 2..4);
        lexer.assert_end(4);
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("a===b!==c+=1=>x??y", test_file_id());
        lexer.assert_next(SyntaxKind::Ident, "a", 0..1);
        lexer.assert_next(SyntaxKind::EqEqEq, "===", 1..4);
        lexer.assert_next(SyntaxKind::Ident, "b", 4..5);
        lexer.assert_next(SyntaxKind::BangEqEq, "!==", 5..8);
        lexer.assert_next(SyntaxKind::Ident, "c", 8..9);
        lexer.assert_next(SyntaxKind::PlusEq, "+=", 9..11);
        lexer.assert_next(SyntaxKind::Number, "1", 11..12);
        lexer.assert_next(SyntaxKind::Arrow, "=>", 12..14);
        lexer.assert_next(SyntaxKind::Ident, "x", 14..15);
        lexer.assert_next(SyntaxKind::QuestionQuestion, "??", 15..17);
        lexer.assert_next(SyntaxKind::Ident, "y", 17..18);
        lexer.assert_end(18);
    }

    #[test]
    fn test_strings() {
        let mut lexer = Lexer::new(r#""a\"b" 'c'"#, test_file_id());
        lexer.assert_next(SyntaxKind::Str, r#""a\"b""#, 0..6);
        lexer.assert_next(SyntaxKind::Str, "'c'", 7..10);
        lexer.assert_end(10);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc", test_file_id());
        lexer.assert_next_error("unclosed string", 0..4);
        lexer.assert_end(4);
    }

    #[test]
    fn test_template_with_nested_slots() {
        let text = "`a${ {x: `b${c}`}.x }d`";
        let mut lexer = Lexer::new(text, test_file_id());
        lexer.assert_next(SyntaxKind::Template, text, 0..text.len());
        lexer.assert_end(text.len());

        let pieces = template_pieces(text).unwrap();
        assert_eq!(
            pieces,
            vec![
                TemplatePiece::Text(1..2),
                TemplatePiece::Code(4..20),
                TemplatePiece::Text(21..22),
            ]
        );
    }

    #[test]
    fn test_unterminated_template() {
        let mut lexer = Lexer::new("`abc${", test_file_id());
        lexer.assert_next_error("unclosed template literal", 0..6);
        lexer.assert_end(6);
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut lexer = Lexer::new("a /* b */ // c\nd", test_file_id());
        lexer.assert_next(SyntaxKind::Ident, "a", 0..1);
        lexer.assert_next(SyntaxKind::Ident, "d", 15..16);
        lexer.assert_end(16);
    }

    #[test]
    fn test_offset_spans() {
        let mut lexer = Lexer::with_offset("x", test_file_id(), 10);
        lexer.assert_next(SyntaxKind::Ident, "x", 10..11);
    }

    #[test]
    fn test_repeating_next_after_end() {
        let mut lexer = Lexer::new("", test_file_id());
        lexer.assert_end(0);
        lexer.assert_end(0);
    }
}
