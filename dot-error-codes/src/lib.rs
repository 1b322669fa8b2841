use std::fmt::Debug;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// The error code (e.g. E0001)
    pub code: &'static str,
    /// The error name (e.g. `UnclosedDelimiter`)
    pub name: &'static str,
    /// The error description
    ///
    /// A markdown string that explains the error and how it can be avoided.
    pub description: &'static str,
}

impl Debug for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.code, self.name)
    }
}

macro_rules! error_codes {
    ($($ident:ident = $code:literal, $name:literal, $description:literal;)*) => {
        $(
            pub const $ident: ErrorCode = ErrorCode {
                code: $code,
                name: $name,
                description: $description,
            };
        )*

        pub const ERROR_CODES: &[ErrorCode] = &[$($ident),*];
    };
}

error_codes! {
    E0001_UNCLOSED_DELIMITER = "E0001", "UnclosedDelimiter",
"# E0001: unclosed delimiter

A string, template literal, block comment or bracket in embedded code was
opened but never closed.

```text
{{= 'abc }}
```

Every `'`, `\"`, `` ` ``, `/*`, `(`, `[` and `{` needs its closing counterpart
inside the same directive or in a later evaluate block.
";
    E0002_INVALID_ASSIGNMENT = "E0002", "InvalidAssignment",
"# E0002: invalid assignment target

Only identifiers, member accesses (`a.b`) and index accesses (`a[b]`) can be
assigned to or incremented.

```text
{{ 1 = it.x; }}
```
";
    E0003_UNEXPECTED_TOKEN = "E0003", "UnexpectedToken",
"# E0003: unexpected token

The embedded code contains a token where it is not allowed, for example a
missing `;` between two statements:

```text
{{ var a = 1 var b = 2; }}
```

Statements inside evaluate blocks must be separated by `;`.
";
    E0004_EXPECTED_EXPRESSION = "E0004", "ExpectedExpression",
"# E0004: expected expression

An operator or directive is missing its operand.

```text
{{= foo + }}
```
";
    E0005_UNDEFINED_VARIABLE = "E0005", "UndefinedVariable",
"# E0005: undefined variable

A name was read that was never declared. Data passed to the template is only
reachable through the template parameter (by default `it`):

```text
{{= foo }}      // error
{{= it.foo }}   // renders `undefined` when the field is missing
```
";
    E0006_NOT_CALLABLE = "E0006", "NotCallable",
"# E0006: value is not callable

A call expression was applied to a value that is not a function.

```text
{{= it.name() }}
```
";
    E0007_PROPERTY_OF_NOTHING = "E0007", "PropertyOfNothing",
"# E0007: property access on undefined or null

Reading or writing a property of `undefined` or `null` is an error. Missing
fields render as `undefined`, but nested access through them fails:

```text
{{= it.missing.field }}
```

Guard the access with a conditional: `{{? it.missing }}{{= it.missing.field }}{{?}}`.
";
    E0008_TYPE_MISMATCH = "E0008", "TypeMismatch",
"# E0008: type mismatch

A builtin function or method received a value of the wrong type, for example
iterating over something that has no `length`.
";
    E0009_CALL_DEPTH_EXCEEDED = "E0009", "CallDepthExceeded",
"# E0009: maximum call depth exceeded

Functions defined in embedded code recursed too deeply.
";
    E0010_DEFINE_RECURSION = "E0010", "DefineRecursion",
"# E0010: define recursion limit reached

Using a define re-resolves its text, so a define that uses itself (directly or
through another define) never terminates:

```text
{{##def.a:{{#def.a}}#}}{{#def.a}}
```
";
    E0011_INVALID_ESCAPE = "E0011", "InvalidEscape",
"# E0011: invalid escape in a raw block

The content of `{{! }}` is read like the inside of a JSON string. Only `\\\\`,
`\\\"`, `\\/`, `\\b`, `\\f`, `\\n`, `\\r`, `\\t` and `\\uXXXX` escapes are allowed,
and control characters must be escaped.

```text
{{!\\q}}
```
";
}

/// Looks up an error code by its textual code, case-insensitively (`e0001` finds `E0001`).
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ERROR_CODES
        .iter()
        .find(|error_code| error_code.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = ERROR_CODES.iter().map(|c| c.code).collect();
        assert_eq!(codes.len(), ERROR_CODES.len());
    }

    #[test]
    fn descriptions_start_with_their_code() {
        for code in ERROR_CODES {
            assert!(
                code.description.starts_with(&format!("# {}", code.code)),
                "{code:?} has a mismatching heading"
            );
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("e0004"), Some(&E0004_EXPECTED_EXPRESSION));
        assert_eq!(lookup("E9999"), None);
    }
}
