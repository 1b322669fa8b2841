use crate::kind::SyntaxKind;
use crate::precedence::{Precedence, PrecedenceTrait};

pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Nullish,
    Eq,
    Neq,
    StrictEq,
    StrictNeq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl BinOp {
    pub(crate) fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::Plus => Self::Add,
            SyntaxKind::Minus => Self::Sub,
            SyntaxKind::Star => Self::Mul,
            SyntaxKind::Slash => Self::Div,
            SyntaxKind::Percent => Self::Mod,
            SyntaxKind::AmpAmp => Self::And,
            SyntaxKind::PipePipe => Self::Or,
            SyntaxKind::QuestionQuestion => Self::Nullish,

            SyntaxKind::EqEq => Self::Eq,
            SyntaxKind::BangEq => Self::Neq,
            SyntaxKind::EqEqEq => Self::StrictEq,
            SyntaxKind::BangEqEq => Self::StrictNeq,
            SyntaxKind::Lt => Self::Lt,
            SyntaxKind::LtEq => Self::Lte,
            SyntaxKind::Gt => Self::Gt,
            SyntaxKind::GtEq => Self::Gte,

            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&&",
            Self::Or => "||",
            Self::Nullish => "??",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::StrictEq => "===",
            Self::StrictNeq => "!==",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }

    pub fn assoc(self) -> Assoc {
        Assoc::Left
    }

    /// Whether the right operand is only evaluated depending on the left one.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Nullish)
    }
}

impl PrecedenceTrait for BinOp {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Nullish => Precedence::Nullish,
            Self::Or => Precedence::LogicalOr,
            Self::And => Precedence::LogicalAnd,
            Self::Eq | Self::Neq | Self::StrictEq | Self::StrictNeq => Precedence::Equals,
            Self::Lt | Self::Lte | Self::Gt | Self::Gte => Precedence::LessGreater,
            Self::Add | Self::Sub => Precedence::Sum,
            Self::Mul | Self::Div | Self::Mod => Precedence::Product,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnOp {
    Plus,
    Minus,
    Not,
    Typeof,
}

impl UnOp {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::Plus => Self::Plus,
            SyntaxKind::Minus => Self::Minus,
            SyntaxKind::Bang => Self::Not,
            SyntaxKind::Typeof => Self::Typeof,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::Typeof => "typeof",
        }
    }
}

impl PrecedenceTrait for UnOp {
    fn precedence(&self) -> Precedence {
        Precedence::Prefix
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::PlusPlus => Self::Increment,
            SyntaxKind::MinusMinus => Self::Decrement,
            _ => return None,
        })
    }

    pub fn delta(self) -> f64 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl AssignOp {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::Eq => Self::Assign,
            SyntaxKind::PlusEq => Self::AddAssign,
            SyntaxKind::MinusEq => Self::SubAssign,
            SyntaxKind::StarEq => Self::MulAssign,
            SyntaxKind::SlashEq => Self::DivAssign,
            SyntaxKind::PercentEq => Self::ModAssign,
            _ => return None,
        })
    }

    /// The binary operator a compound assignment applies, `None` for plain `=`.
    pub fn binary(self) -> Option<BinOp> {
        match self {
            Self::Assign => None,
            Self::AddAssign => Some(BinOp::Add),
            Self::SubAssign => Some(BinOp::Sub),
            Self::MulAssign => Some(BinOp::Mul),
            Self::DivAssign => Some(BinOp::Div),
            Self::ModAssign => Some(BinOp::Mod),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
        }
    }
}
