use ecow::EcoString;
use regex::Regex;
use std::sync::LazyLock;

static SPACE_AT_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\r|\n)\t* +| +\t*(\r|\n|$)").expect("valid whitespace pattern")
});

static BREAKS_AND_COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r|\n|\t|/\*[\s\S]*?\*/").expect("valid comment pattern")
});

/// Collapses indentation and trailing spaces to a single space, then drops
/// line breaks, tabs and `/* */` comments.
pub fn strip(text: &str) -> EcoString {
    let collapsed = SPACE_AT_LINE_BREAK.replace_all(text, " ");
    EcoString::from(&*BREAKS_AND_COMMENTS.replace_all(&collapsed, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_indentation_and_comments() {
        assert_eq!(strip("<ul>\n    <li>/* note */x</li>\n</ul>"), "<ul> <li>x</li></ul>");
    }

    #[test]
    fn keeps_inner_spaces() {
        assert_eq!(strip("a  b\tc"), "a  bc");
    }
}
