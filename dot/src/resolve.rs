//! Resolution of `{{##define#}}` and `{{#use}}` directives.

use crate::definitions::{Definition, Definitions, ExpansionCache, ExpansionKey, substitute};
use crate::settings::Settings;
use dot_error_codes::E0010_DEFINE_RECURSION;
use dot_eval::eval_expression;
use dot_library::Value;
use dot_library::diag::{SourceResult, Trace, TracePoint, bail, error};
use dot_syntax::{FileId, Source, Span};
use dot_utils::{trace_fn, trace_log};
use ecow::EcoString;
use regex::{Captures, Regex};

/// How often the text of a use may be resolved again before giving up.
const MAX_DEPTH: usize = 64;

/// Strips define and use directives from `template`, registering defines in
/// `defs` and splicing in what uses evaluate to.
pub fn resolve(template: &Source, settings: &Settings, defs: &mut Definitions) -> SourceResult<EcoString> {
    trace_fn!("resolve", "{}", template.name());
    let mut resolver = Resolver {
        settings,
        defs,
        cache: ExpansionCache::new(),
        file_id: template.id(),
        depth: 0,
    };
    resolver.resolve(template.text(), None)
}

struct Resolver<'a> {
    settings: &'a Settings,
    defs: &'a mut Definitions,
    cache: ExpansionCache,
    file_id: FileId,
    depth: usize,
}

impl Resolver<'_> {
    /// Resolves `text`. `site` is the use in the template that `text` came
    /// from, `None` for the template itself.
    fn resolve(&mut self, text: &str, site: Option<Span>) -> SourceResult<EcoString> {
        let file_id = self.file_id;
        let span_of = |range: std::ops::Range<usize>| match site {
            Some(span) => span,
            None => Span::new(file_id, range),
        };

        let settings = self.settings;
        let text = match &settings.define {
            Some(define) => replace_all(define, text, |caps| {
                let span = span_of(whole(caps));
                self.define(caps, span)?;
                Ok(EcoString::new())
            })?,
            None => text.into(),
        };

        match &settings.use_ {
            Some(use_) => replace_all(use_, &text, |caps| {
                let span = span_of(whole(caps));
                self.use_site(group(caps, 1), span)
            }),
            None => Ok(text),
        }
    }

    fn define(&mut self, caps: &Captures, span: Span) -> SourceResult<()> {
        let name = group(caps, 1);
        let name = name.strip_prefix("def.").unwrap_or(name);
        if self.defs.contains(name) {
            trace_log!("define `{}` is already known", name);
            return Ok(());
        }

        let value = group(caps, 3);
        let definition = if group(caps, 2) == ":" {
            let params = self
                .settings
                .define_params
                .as_ref()
                .and_then(|re| re.captures(value));
            match params {
                Some(params) => Definition::Snippet {
                    param: group(&params, 1).into(),
                    body: group(&params, 2).into(),
                },
                None => Definition::Text(value.into()),
            }
        } else {
            let def = self.defs.to_object();
            let file_id = crate::intern("<define>")?;
            let value = eval_expression(value, file_id, [(EcoString::from("def"), Value::Object(def.clone()))])
                .trace(|| TracePoint::Define(name.into()), span)?;
            self.defs.absorb(&def);
            Definition::from_value(value)
        };

        trace_log!("defined `{}` as {:?}", name, definition);
        self.defs.insert(name, definition);
        Ok(())
    }

    fn use_site(&mut self, code: &str, span: Span) -> SourceResult<EcoString> {
        let settings = self.settings;
        let code = match &settings.use_params {
            Some(use_params) => use_params
                .replace_all(code, |caps: &Captures| self.expand(caps))
                .into_owned(),
            None => code.to_string(),
        };

        let def = self.defs.to_object();
        let bindings = [
            (EcoString::from("def"), Value::Object(def.clone())),
            ("__expansions".into(), Value::Array(self.cache.to_array())),
        ];
        let value = eval_expression(&code, crate::intern("<use>")?, bindings)
            .trace(|| TracePoint::Use(code.trim().into()), span)?;
        self.defs.absorb(&def);

        if !value.truthy() {
            return Ok(value.to_js_string());
        }

        if self.depth >= MAX_DEPTH {
            bail!(
                error!(span, "defines were expanded more than {} times in a row", MAX_DEPTH)
                    .with_code(&E0010_DEFINE_RECURSION)
                    .with_hint("a define probably uses itself")
            );
        }
        self.depth += 1;
        let resolved = self.resolve(&value.to_js_string(), Some(span));
        self.depth -= 1;
        resolved
    }

    /// Rewrites `def.name:argument` to refer to the expansion of the snippet
    /// for that argument.
    fn expand(&mut self, caps: &Captures) -> String {
        let (prefix, name, argument) = (group(caps, 1), group(caps, 2), group(caps, 3));
        let Some(Definition::Snippet { param, body }) = self.defs.get(name) else {
            return whole_text(caps).to_string();
        };
        if param.is_empty() || argument.is_empty() {
            return whole_text(caps).to_string();
        }

        let key = ExpansionKey {
            name: name.into(),
            argument: argument.into(),
        };
        let slot = self.cache.expand(key, || substitute(body, param, argument));
        trace_log!("`{}:{}` expands into slot {}", name, argument, slot);
        format!("{prefix}__expansions[{slot}]")
    }
}

/// Like [`Regex::replace_all`], with a replacement that can fail.
fn replace_all(
    re: &Regex,
    text: &str,
    mut replace: impl FnMut(&Captures) -> SourceResult<EcoString>,
) -> SourceResult<EcoString> {
    let mut out = EcoString::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let range = whole(&caps);
        out.push_str(&text[last..range.start]);
        out.push_str(&replace(&caps)?);
        last = range.end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn whole(caps: &Captures) -> std::ops::Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

fn whole_text<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(0).map_or("", |m| m.as_str())
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}
