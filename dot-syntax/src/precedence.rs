#[derive(Debug, PartialEq, Eq, Clone, PartialOrd, Ord, Copy)]
pub enum Precedence {
    Lowest,
    Assign,      // = += -= ...
    Conditional, // a ? b : c
    Nullish,     // ??
    LogicalOr,   // ||
    LogicalAnd,  // &&
    Equals,      // == === != !==
    LessGreater, // < <= > >=
    Sum,         // + or -
    Product,     // * / %
    Prefix,      // -x !x typeof x ++x
}

pub trait PrecedenceTrait {
    fn precedence(&self) -> Precedence;
}
