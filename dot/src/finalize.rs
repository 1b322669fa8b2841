//! Wraps a generated body into the complete render function source.

use ecow::EcoString;
use regex::Regex;
use std::sync::LazyLock;

static EMPTY_APPEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s|;|\}|^|\{)out\+=``;").expect("valid append pattern"));

/// Declares `out`, appends the body, returns `out`, and cleans up the no-op
/// appends that directive boundaries leave behind.
pub fn finalize(body: &str) -> EcoString {
    let source = format!("let out=`{body}`;return out;")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r");

    let source = EMPTY_APPEND.replace_all(&source, "${1}");
    source.replace("+``", "").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text() {
        assert_eq!(finalize("hello\n"), "let out=`hello\\n`;return out;");
    }

    #[test]
    fn empty_appends_are_removed() {
        assert_eq!(
            finalize("`;if(it.a){out+=``;}out+=`"),
            "let out=``;if(it.a){}return out;"
        );
    }

    #[test]
    fn empty_concatenations_are_removed() {
        assert_eq!(finalize("`+(it.a)+`"), "let out=``+(it.a);return out;");
    }
}
