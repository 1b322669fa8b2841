/// The kind of a token produced by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SyntaxKind {
    End,
    Error,
    Comment,

    Ident,
    Number,
    Str,
    Template,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,
    QuestionQuestion,
    Arrow,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    PlusPlus,
    MinusMinus,

    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    EqEq,
    EqEqEq,
    BangEq,
    BangEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,

    Let,
    Var,
    Const,
    If,
    Else,
    For,
    While,
    Function,
    Return,
    Break,
    Continue,
    True,
    False,
    Null,
    Typeof,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Comment)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::Let
                | SyntaxKind::Var
                | SyntaxKind::Const
                | SyntaxKind::If
                | SyntaxKind::Else
                | SyntaxKind::For
                | SyntaxKind::While
                | SyntaxKind::Function
                | SyntaxKind::Return
                | SyntaxKind::Break
                | SyntaxKind::Continue
                | SyntaxKind::True
                | SyntaxKind::False
                | SyntaxKind::Null
                | SyntaxKind::Typeof
        )
    }

    /// A human readable name used in error messages.
    pub fn descriptive_name(self) -> &'static str {
        match self {
            SyntaxKind::End => "end of input",
            SyntaxKind::Error => "syntax error",
            SyntaxKind::Comment => "comment",
            SyntaxKind::Ident => "identifier",
            SyntaxKind::Number => "number",
            SyntaxKind::Str => "string",
            SyntaxKind::Template => "template literal",
            SyntaxKind::LeftParen => "`(`",
            SyntaxKind::RightParen => "`)`",
            SyntaxKind::LeftBracket => "`[`",
            SyntaxKind::RightBracket => "`]`",
            SyntaxKind::LeftBrace => "`{`",
            SyntaxKind::RightBrace => "`}`",
            SyntaxKind::Comma => "`,`",
            SyntaxKind::Semicolon => "`;`",
            SyntaxKind::Colon => "`:`",
            SyntaxKind::Dot => "`.`",
            SyntaxKind::Question => "`?`",
            SyntaxKind::QuestionQuestion => "`??`",
            SyntaxKind::Arrow => "`=>`",
            SyntaxKind::Plus => "`+`",
            SyntaxKind::Minus => "`-`",
            SyntaxKind::Star => "`*`",
            SyntaxKind::Slash => "`/`",
            SyntaxKind::Percent => "`%`",
            SyntaxKind::Bang => "`!`",
            SyntaxKind::PlusPlus => "`++`",
            SyntaxKind::MinusMinus => "`--`",
            SyntaxKind::Eq => "`=`",
            SyntaxKind::PlusEq => "`+=`",
            SyntaxKind::MinusEq => "`-=`",
            SyntaxKind::StarEq => "`*=`",
            SyntaxKind::SlashEq => "`/=`",
            SyntaxKind::PercentEq => "`%=`",
            SyntaxKind::EqEq => "`==`",
            SyntaxKind::EqEqEq => "`===`",
            SyntaxKind::BangEq => "`!=`",
            SyntaxKind::BangEqEq => "`!==`",
            SyntaxKind::Lt => "`<`",
            SyntaxKind::LtEq => "`<=`",
            SyntaxKind::Gt => "`>`",
            SyntaxKind::GtEq => "`>=`",
            SyntaxKind::AmpAmp => "`&&`",
            SyntaxKind::PipePipe => "`||`",
            SyntaxKind::Let => "keyword `let`",
            SyntaxKind::Var => "keyword `var`",
            SyntaxKind::Const => "keyword `const`",
            SyntaxKind::If => "keyword `if`",
            SyntaxKind::Else => "keyword `else`",
            SyntaxKind::For => "keyword `for`",
            SyntaxKind::While => "keyword `while`",
            SyntaxKind::Function => "keyword `function`",
            SyntaxKind::Return => "keyword `return`",
            SyntaxKind::Break => "keyword `break`",
            SyntaxKind::Continue => "keyword `continue`",
            SyntaxKind::True => "`true`",
            SyntaxKind::False => "`false`",
            SyntaxKind::Null => "`null`",
            SyntaxKind::Typeof => "keyword `typeof`",
        }
    }
}
