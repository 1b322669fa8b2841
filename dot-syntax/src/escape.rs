use ecow::{EcoString, eco_format};
use unscanny::Scanner;

/// Resolves script escape sequences (`\n`, `\t`, `\x41`, `\u{1F600}`, ...).
///
/// Unknown escapes yield the escaped character itself, an escaped line break
/// is a line continuation and disappears.
pub fn unescape(text: &str) -> EcoString {
    if !text.contains('\\') {
        return text.into();
    }

    let mut out = EcoString::with_capacity(text.len());
    let mut s = Scanner::new(text);

    while let Some(c) = s.eat() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = s.eat() else {
            out.push('\\');
            break;
        };

        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{C}'),
            'v' => out.push('\u{B}'),
            '0' if !s.at(char::is_ascii_digit) => out.push('\0'),
            'x' => match hex_char(&mut s, 2) {
                Some(c) => out.push(c),
                None => out.push('x'),
            },
            'u' if s.eat_if('{') => {
                let start = s.cursor();
                s.eat_while(char::is_ascii_hexdigit);
                let digits = s.from(start);
                match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
                    Some(c) if s.eat_if('}') => out.push(c),
                    _ => {
                        out.push_str("u{");
                        out.push_str(digits);
                    }
                }
            }
            'u' => match hex_char(&mut s, 4) {
                Some(c) => out.push(c),
                None => out.push('u'),
            },
            '\r' => {
                s.eat_if('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    out
}

/// Resolves escapes the way the inside of a JSON string is read.
///
/// Fails on unknown or truncated escapes and on unescaped control characters.
/// A `"` needs no escape. Surrogate pairs written as two `\uXXXX` escapes
/// combine into one character.
pub fn unescape_json(text: &str) -> Result<EcoString, EcoString> {
    let mut out = EcoString::with_capacity(text.len());
    let mut s = Scanner::new(text);

    while let Some(c) = s.eat() {
        match c {
            '\\' => {}
            c if (c as u32) < 0x20 => {
                return Err(eco_format!("unescaped control character {:?}", c));
            }
            c => {
                out.push(c);
                continue;
            }
        }

        let escaped = s
            .eat()
            .ok_or_else(|| EcoString::from("escape at the end of the text"))?;
        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => out.push(json_unicode(&mut s)?),
            other => return Err(eco_format!("invalid escape `\\{}`", other)),
        }
    }

    Ok(out)
}

fn json_unicode(s: &mut Scanner) -> Result<char, EcoString> {
    let high = hex_unit(s)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high).ok_or_else(|| eco_format!("lone surrogate `\\u{:04X}`", high));
    }

    let start = s.cursor();
    if s.eat_if("\\u") {
        let low = hex_unit(s)?;
        if (0xDC00..0xE000).contains(&low) {
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            if let Some(c) = char::from_u32(combined) {
                return Ok(c);
            }
        }
    }
    s.jump(start);
    Err(eco_format!("lone surrogate `\\u{:04X}`", high))
}

fn hex_unit(s: &mut Scanner) -> Result<u32, EcoString> {
    let rest = s.after();
    let digits = rest
        .get(..4)
        .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| EcoString::from("`\\u` must be followed by four hex digits"))?;
    let unit = u32::from_str_radix(digits, 16).map_err(|e| eco_format!("{e}"))?;
    s.jump(s.cursor() + 4);
    Ok(unit)
}

fn hex_char(s: &mut Scanner, len: usize) -> Option<char> {
    let start = s.cursor();
    let rest = s.after();
    let digits = rest.get(..len)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let c = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
    s.jump(start + len);
    Some(c)
}

/// Replaces raw line breaks and tabs in embedded code with spaces, so the
/// code fits on the single line of generated source.
pub fn flatten_code(code: &str) -> EcoString {
    code.chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => ' ',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"\"\'\\\`"#), "\"'\\`");
        assert_eq!(unescape(r"\$\{"), "${");
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(unescape(r"\x41B\u{43}"), "ABC");
        assert_eq!(unescape(r"\u{1F600}"), "\u{1F600}");
    }

    #[test]
    fn test_invalid_escapes_keep_the_letter() {
        assert_eq!(unescape(r"\xZZ"), "xZZ");
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_json_escapes() {
        assert_eq!(unescape_json(r#"a\tb\n\"q\"\/\\"#).unwrap(), "a\tb\n\"q\"/\\");
        assert_eq!(unescape_json(r#"say "hi""#).unwrap(), "say \"hi\"");
        assert_eq!(unescape_json(r"\u0041\ud83d\ude00").unwrap(), "A\u{1F600}");
    }

    #[test]
    fn test_json_escapes_reject_invalid() {
        assert_eq!(unescape_json(r"\q").unwrap_err(), "invalid escape `\\q`");
        assert!(unescape_json(r"\x41").is_err());
        assert!(unescape_json(r"\u12").is_err());
        assert!(unescape_json(r"\ud83d").is_err());
        assert!(unescape_json("tab\there").is_err());
        assert!(unescape_json("end\\").is_err());
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(unescape("a\\\nb"), "ab");
    }

    #[test]
    fn test_flatten_code() {
        assert_eq!(flatten_code("a\n\tb\r\nc"), "a  b  c");
    }
}
