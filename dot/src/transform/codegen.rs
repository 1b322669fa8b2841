use crate::settings::Settings;
use crate::transform::lexer::Instruction;
use dot_error_codes::E0011_INVALID_ESCAPE;
use dot_library::diag::{SourceResult, bail, error};
use dot_syntax::{Span, flatten_code, unescape_json};
use dot_utils::trace_fn;
use std::fmt::Write;

/// Emits the body of the render function for `instructions`.
///
/// The body continues a backtick literal that is being appended to `out`:
/// literal text is written into it, every directive closes it, does its work
/// and reopens it.
///
/// Fails when the content of a raw block is not a valid escaped string.
pub fn generate(instructions: &[Instruction], settings: &Settings) -> SourceResult<String> {
    trace_fn!("generate", "{} instructions", instructions.len());
    let mut out = String::new();
    let mut loops = 0usize;

    for instruction in instructions {
        match *instruction {
            Instruction::Literal(text) => escape_literal(&mut out, text),
            Instruction::Raw("") => escape_literal(&mut out, &settings.newline),
            Instruction::Raw(content) => match unescape_json(content) {
                Ok(text) => escape_literal(&mut out, &text),
                Err(message) => bail!(
                    error!(Span::detached(), "invalid raw block `{}`: {}", content, message)
                        .with_code(&E0011_INVALID_ESCAPE)
                ),
            },
            Instruction::Interpolate(code) => {
                let code = flatten_code(code);
                if settings.tstring {
                    let _ = write!(out, "${{{code}}}");
                } else {
                    let _ = write!(out, "`+({code})+`");
                }
            }
            Instruction::Conditional { else_flag, test } => {
                let test = test.map(flatten_code);
                let _ = match (else_flag, test) {
                    (true, Some(test)) => write!(out, "`;}}else if({test}){{out+=`"),
                    (true, None) => write!(out, "`;}}else{{out+=`"),
                    (false, Some(test)) => write!(out, "`;if({test}){{out+=`"),
                    (false, None) => write!(out, "`;}}out+=`"),
                };
            }
            Instruction::IterateOpen {
                iterable,
                element,
                index,
            } => {
                let iterable = flatten_code(iterable);
                let i = format!("i{loops}");
                loops += 1;
                let _ = write!(
                    out,
                    "`;for(let {i}=0;{i}<{iterable}.length;{i}++){{let {element}={iterable}[{i}]"
                );
                if let Some(index) = index {
                    let _ = write!(out, ",{index}={i}");
                }
                out.push_str(";out+=`");
            }
            Instruction::IterateClose => out.push_str("`;}out+=`"),
            Instruction::Evaluate(code) => {
                let _ = write!(out, "`;{}out+=`", flatten_code(code));
            }
        }
    }

    Ok(out)
}

/// Writes `text` so that it reads back verbatim inside a backtick literal.
///
/// Every `$` is escaped, since the `{` that would open a slot with it may come
/// from the next instruction.
fn escape_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsOverride;
    use crate::transform::lex;

    fn gen_with(text: &str, overrides: SettingsOverride) -> String {
        let settings = Settings::baseline().merge(&overrides);
        generate(&lex(text, &settings), &settings).unwrap()
    }

    fn gen_default(text: &str) -> String {
        gen_with(text, SettingsOverride::new())
    }

    #[test]
    fn literal_text_is_escaped() {
        assert_eq!(gen_default(r"a`b\c${d}$e"), r"a\`b\\c\${d}\$e");
    }

    #[test]
    fn interpolation_styles() {
        assert_eq!(gen_default("{{=it.a}}"), "`+(it.a)+`");
        assert_eq!(gen_with("{{=it.a}}", SettingsOverride::new().tstring(true)), "${it.a}");
    }

    #[test]
    fn conditional_branches() {
        assert_eq!(
            gen_default("{{?it.a}}A{{??it.b}}B{{??}}C{{?}}"),
            "`;if(it.a){out+=`A`;}else if(it.b){out+=`B`;}else{out+=`C`;}out+=`"
        );
    }

    #[test]
    fn loops_get_distinct_counters() {
        let code = gen_default("{{~it.a :x}}{{~}}{{~it.b :y:j}}{{~}}");
        assert_eq!(
            code,
            "`;for(let i0=0;i0<it.a.length;i0++){let x=it.a[i0];out+=``;}out+=`\
             `;for(let i1=0;i1<it.b.length;i1++){let y=it.b[i1],j=i1;out+=``;}out+=`"
        );
    }

    #[test]
    fn embedded_code_is_flattened() {
        assert_eq!(gen_default("{{\n\tvar x = 1;\n}}"), "`;  var x = 1; out+=`");
    }

    #[test]
    fn raw_content_is_unescaped() {
        assert_eq!(gen_default("{{!\\t}}{{!}}"), "\t\n");
        assert_eq!(gen_with("{{!}}", SettingsOverride::new().newline("<br>")), "<br>");
    }

    #[test]
    fn dollar_before_raw_brace_stays_text() {
        let settings = Settings::baseline().merge(&SettingsOverride::new().strip(false));
        let code = generate(&lex("${{!{}}it.x}", &settings), &settings).unwrap();
        assert_eq!(code, "\\${it.x}");
    }

    #[test]
    fn invalid_raw_escape_is_an_error() {
        let settings = Settings::baseline();
        let errors = generate(&lex("a{{!\\q}}b", settings), settings).unwrap_err();
        assert_eq!(errors[0].code, Some(&E0011_INVALID_ESCAPE));
        assert!(errors[0].message.contains("\\q"));
    }
}
