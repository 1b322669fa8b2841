use crate::kind::SyntaxKind;

/// A set of [`SyntaxKind`]s, stored as a bit set.
#[derive(Default, Copy, Clone)]
pub struct SyntaxSet(u128);

const BITS: u8 = 128;

impl SyntaxSet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn add(self, kind: SyntaxKind) -> Self {
        assert!((kind as u8) < BITS);
        Self(self.0 | bit(kind))
    }

    pub const fn contains(self, kind: SyntaxKind) -> bool {
        (kind as u8) < BITS && (self.0 & bit(kind)) != 0
    }
}

const fn bit(kind: SyntaxKind) -> u128 {
    1 << (kind as usize)
}

macro_rules! syntax_set {
    ($($kind:ident),* $(,)?) => {{
        const SET: crate::set::SyntaxSet = crate::set::SyntaxSet::new()
        $(.add(crate::kind::SyntaxKind:: $kind))*;
        SET
    }}
}

pub(crate) use syntax_set;

pub const DECL: SyntaxSet = syntax_set![Let, Var, Const];

/// Tokens at which the parser resumes after a broken statement.
pub const STMT_RECOVER: SyntaxSet = syntax_set![Semicolon, RightBrace, End];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        assert!(DECL.contains(SyntaxKind::Const));
        assert!(!DECL.contains(SyntaxKind::Function));
        assert!(STMT_RECOVER.contains(SyntaxKind::End));
    }
}
