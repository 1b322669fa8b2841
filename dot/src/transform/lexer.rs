use crate::settings::{Directive, Settings};
use dot_utils::trace_fn;
use regex::{Captures, Regex};

/// One step of the render function.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Instruction<'s> {
    /// Text outside of any directive.
    Literal(&'s str),
    /// `{{!content}}`, content still escaped.
    Raw(&'s str),
    /// `{{=code}}`
    Interpolate(&'s str),
    /// `{{? test}}`, `{{?? test}}`, `{{??}}` and `{{?}}`.
    Conditional {
        else_flag: bool,
        test: Option<&'s str>,
    },
    /// `{{~ iterable :element:index}}`
    IterateOpen {
        iterable: &'s str,
        element: &'s str,
        index: Option<&'s str>,
    },
    /// `{{~}}`
    IterateClose,
    /// `{{ code }}`
    Evaluate(&'s str),
}

/// Directives that produce instructions. When two of them match at the same
/// position, the one listed first wins.
const PRECEDENCE: [Directive; 5] = [
    Directive::Raw,
    Directive::Interpolate,
    Directive::Conditional,
    Directive::Iterate,
    Directive::Evaluate,
];

/// The next match of one directive's pattern.
struct Cursor<'s, 'r> {
    directive: Directive,
    regex: &'r Regex,
    next: Option<Captures<'s>>,
    exhausted: bool,
}

impl<'s> Cursor<'s, '_> {
    /// The start of the first match at or after `pos`.
    fn peek(&mut self, text: &'s str, pos: usize) -> Option<usize> {
        if self.exhausted {
            return None;
        }

        let stale = match &self.next {
            Some(caps) => start(caps) < pos,
            None => true,
        };
        if stale {
            self.next = self.regex.captures_at(text, pos);
            self.exhausted = self.next.is_none();
        }

        self.next.as_ref().map(start)
    }
}

/// Splits `text` into instructions using the directive patterns of
/// `settings`.
pub fn lex<'s>(text: &'s str, settings: &Settings) -> Vec<Instruction<'s>> {
    trace_fn!("lex_directives");
    let mut cursors: Vec<Cursor> = PRECEDENCE
        .iter()
        .filter_map(|&directive| {
            Some(Cursor {
                directive,
                regex: settings.pattern(directive)?,
                next: None,
                exhausted: false,
            })
        })
        .collect();

    let mut instructions = vec![];
    let mut pos = 0;
    while pos < text.len() {
        let mut earliest: Option<(usize, usize)> = None;
        for (i, cursor) in cursors.iter_mut().enumerate() {
            if let Some(at) = cursor.peek(text, pos)
                && earliest.is_none_or(|(_, best)| at < best)
            {
                earliest = Some((i, at));
            }
        }

        let Some((i, at)) = earliest else {
            break;
        };

        let Some(caps) = cursors[i].next.take() else {
            break;
        };
        let end = caps.get(0).map_or(at, |m| m.end());
        if end == at {
            // An empty match would never advance, treat its position as text.
            let next = text[at..].chars().next().map_or(text.len(), |c| at + c.len_utf8());
            push_literal(&mut instructions, &text[pos..next]);
            pos = next;
            continue;
        }

        push_literal(&mut instructions, &text[pos..at]);
        instructions.push(instruction(cursors[i].directive, &caps));
        pos = end;
    }

    push_literal(&mut instructions, &text[pos..]);
    instructions
}

fn push_literal<'s>(instructions: &mut Vec<Instruction<'s>>, text: &'s str) {
    if !text.is_empty() {
        instructions.push(Instruction::Literal(text));
    }
}

fn instruction<'s>(directive: Directive, caps: &Captures<'s>) -> Instruction<'s> {
    let group = |index: usize| caps.get(index).map(|m| m.as_str());
    match directive {
        Directive::Raw => Instruction::Raw(group(1).unwrap_or_default()),
        Directive::Interpolate => Instruction::Interpolate(group(1).unwrap_or_default()),
        Directive::Conditional => Instruction::Conditional {
            else_flag: group(1).is_some_and(|flag| !flag.is_empty()),
            test: group(2).filter(|test| !test.trim().is_empty()),
        },
        Directive::Iterate => match group(1) {
            Some(iterable) => Instruction::IterateOpen {
                iterable,
                element: group(2).unwrap_or_default(),
                index: group(3),
            },
            None => Instruction::IterateClose,
        },
        _ => Instruction::Evaluate(group(1).unwrap_or_default()),
    }
}

fn start(caps: &Captures) -> usize {
    caps.get(0).map_or(0, |m| m.start())
}
