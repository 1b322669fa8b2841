//! Directive syntax and code generation switches.

use ecow::EcoString;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Receives the generated source of every compiled template.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// The configuration of one compile call.
///
/// A pattern of `None` disables its directive: its syntax is then plain text.
/// Custom patterns must keep the capture groups of the default ones.
#[derive(Clone)]
pub struct Settings {
    pub evaluate: Option<Regex>,
    pub interpolate: Option<Regex>,
    pub raw: Option<Regex>,
    pub use_: Option<Regex>,
    pub use_params: Option<Regex>,
    pub define: Option<Regex>,
    pub define_params: Option<Regex>,
    pub conditional: Option<Regex>,
    pub iterate: Option<Regex>,
    /// The name the data context is bound to.
    pub varname: EcoString,
    /// What an empty `{{!}}` renders as.
    pub newline: EcoString,
    /// Collapse whitespace around line breaks and drop `/* */` comments.
    pub strip: bool,
    /// Emit interpolations as `${...}` slots instead of concatenations.
    pub tstring: bool,
    pub log: Option<LogSink>,
}

/// Names a directive whose pattern can be overridden.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Directive {
    Evaluate,
    Interpolate,
    Raw,
    Use,
    UseParams,
    Define,
    DefineParams,
    Conditional,
    Iterate,
}

impl Directive {
    pub const ALL: [Directive; 9] = [
        Directive::Evaluate,
        Directive::Interpolate,
        Directive::Raw,
        Directive::Use,
        Directive::UseParams,
        Directive::Define,
        Directive::DefineParams,
        Directive::Conditional,
        Directive::Iterate,
    ];
}

fn pattern(re: &str) -> Option<Regex> {
    Some(Regex::new(re).expect("baseline patterns are valid"))
}

static BASELINE: LazyLock<Settings> = LazyLock::new(|| Settings {
    evaluate: pattern(r"\{\{([\s\S]+?\]*)\}\}"),
    interpolate: pattern(r"\{\{=([\s\S]+?)\}\}"),
    raw: pattern(r"\{\{!([\s\S]*?)\}\}"),
    use_: pattern(r"\{\{#([\s\S]+?)\}\}"),
    use_params: pattern(
        r#"(^|[^\w$])def(?:\.|\[['"])([\w$.]+)(?:['"]\])?\s*:\s*([\w$.]+|"[^"]+"|'[^']+'|\{[^}]+\})"#,
    ),
    define: pattern(r"\{\{##\s*([\w.$]+)\s*(:|=)([\s\S]+?)#\}\}"),
    define_params: pattern(r"^\s*([\w$]+):([\s\S]+)"),
    conditional: pattern(r"\{\{\?(\?)?\s*([\s\S]*?)\s*\}\}"),
    iterate: pattern(
        r"\{\{~\s*(?:\}\}|([\s\S]+?)\s*:\s*([\w$]+)\s*(?::\s*([\w$]+))?\s*\}\})",
    ),
    varname: "it".into(),
    newline: "\n".into(),
    strip: true,
    tstring: false,
    log: None,
});

impl Settings {
    /// The frozen process-wide defaults.
    pub fn baseline() -> &'static Settings {
        &BASELINE
    }

    pub fn pattern(&self, directive: Directive) -> Option<&Regex> {
        match directive {
            Directive::Evaluate => self.evaluate.as_ref(),
            Directive::Interpolate => self.interpolate.as_ref(),
            Directive::Raw => self.raw.as_ref(),
            Directive::Use => self.use_.as_ref(),
            Directive::UseParams => self.use_params.as_ref(),
            Directive::Define => self.define.as_ref(),
            Directive::DefineParams => self.define_params.as_ref(),
            Directive::Conditional => self.conditional.as_ref(),
            Directive::Iterate => self.iterate.as_ref(),
        }
    }

    fn pattern_mut(&mut self, directive: Directive) -> &mut Option<Regex> {
        match directive {
            Directive::Evaluate => &mut self.evaluate,
            Directive::Interpolate => &mut self.interpolate,
            Directive::Raw => &mut self.raw,
            Directive::Use => &mut self.use_,
            Directive::UseParams => &mut self.use_params,
            Directive::Define => &mut self.define,
            Directive::DefineParams => &mut self.define_params,
            Directive::Conditional => &mut self.conditional,
            Directive::Iterate => &mut self.iterate,
        }
    }

    /// Returns a copy of these settings with `overrides` applied on top.
    pub fn merge(&self, overrides: &SettingsOverride) -> Settings {
        let mut merged = self.clone();
        for (directive, pattern) in &overrides.patterns {
            *merged.pattern_mut(*directive) = pattern.clone();
        }
        if let Some(varname) = &overrides.varname {
            merged.varname = varname.clone();
        }
        if let Some(newline) = &overrides.newline {
            merged.newline = newline.clone();
        }
        if let Some(strip) = overrides.strip {
            merged.strip = strip;
        }
        if let Some(tstring) = overrides.tstring {
            merged.tstring = tstring;
        }
        if let Some(log) = &overrides.log {
            merged.log = log.clone();
        }
        merged
    }

    /// Whether the define/use resolution stage has anything to do.
    pub fn resolves_definitions(&self) -> bool {
        self.use_.is_some() || self.define.is_some()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::baseline().clone()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Settings");
        for directive in Directive::ALL {
            debug.field(
                &format!("{directive:?}"),
                &self.pattern(directive).map(Regex::as_str),
            );
        }
        debug
            .field("varname", &self.varname)
            .field("newline", &self.newline)
            .field("strip", &self.strip)
            .field("tstring", &self.tstring)
            .field("log", &self.log.is_some())
            .finish()
    }
}

/// Caller overrides for one compile call. Every field left unset keeps the
/// default.
///
/// ```ignore
/// let overrides = SettingsOverride::new()
///     .varname("data")
///     .disable(Directive::Evaluate)
///     .strip(false);
/// ```
#[derive(Clone, Default)]
pub struct SettingsOverride {
    patterns: Vec<(Directive, Option<Regex>)>,
    varname: Option<EcoString>,
    newline: Option<EcoString>,
    strip: Option<bool>,
    tstring: Option<bool>,
    log: Option<Option<LogSink>>,
}

impl SettingsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pattern of `directive`.
    pub fn pattern(mut self, directive: Directive, pattern: Regex) -> Self {
        self.patterns.push((directive, Some(pattern)));
        self
    }

    /// Turns `directive` off.
    pub fn disable(mut self, directive: Directive) -> Self {
        self.patterns.push((directive, None));
        self
    }

    pub fn varname(mut self, varname: impl Into<EcoString>) -> Self {
        self.varname = Some(varname.into());
        self
    }

    pub fn newline(mut self, newline: impl Into<EcoString>) -> Self {
        self.newline = Some(newline.into());
        self
    }

    pub fn strip(mut self, strip: bool) -> Self {
        self.strip = Some(strip);
        self
    }

    pub fn tstring(mut self, tstring: bool) -> Self {
        self.tstring = Some(tstring);
        self
    }

    pub fn log(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Some(Some(Arc::new(sink)));
        self
    }

    pub fn no_log(mut self) -> Self {
        self.log = Some(None);
        self
    }
}

impl fmt::Debug for SettingsOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsOverride")
            .field(
                "patterns",
                &self
                    .patterns
                    .iter()
                    .map(|(d, p)| (d, p.as_ref().map(Regex::as_str)))
                    .collect::<Vec<_>>(),
            )
            .field("varname", &self.varname)
            .field("newline", &self.newline)
            .field("strip", &self.strip)
            .field("tstring", &self.tstring)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_does_not_touch_the_baseline() {
        let merged = Settings::baseline().merge(
            &SettingsOverride::new()
                .varname("data")
                .disable(Directive::Evaluate)
                .tstring(true),
        );

        assert_eq!(merged.varname, "data");
        assert!(merged.evaluate.is_none());
        assert!(merged.tstring);

        let baseline = Settings::baseline();
        assert_eq!(baseline.varname, "it");
        assert!(baseline.evaluate.is_some());
        assert!(!baseline.tstring);
    }

    #[test]
    fn later_overrides_win() {
        let merged = Settings::baseline().merge(
            &SettingsOverride::new()
                .disable(Directive::Raw)
                .pattern(Directive::Raw, Regex::new(r"<%!(.*?)%>").unwrap()),
        );
        assert_eq!(merged.raw.as_ref().map(Regex::as_str), Some(r"<%!(.*?)%>"));
    }

    #[test]
    fn baseline_patterns_match_their_directives() {
        let s = Settings::baseline();
        let caps = s.iterate.as_ref().unwrap().captures("{{~it.list :v:i}}").unwrap();
        assert_eq!(&caps[1], "it.list");
        assert_eq!(&caps[2], "v");
        assert_eq!(&caps[3], "i");

        let caps = s.conditional.as_ref().unwrap().captures("{{??it.x}}").unwrap();
        assert!(caps.get(1).is_some());
        assert_eq!(&caps[2], "it.x");

        let caps = s.define.as_ref().unwrap().captures("{{##def.a:b:c#}}").unwrap();
        assert_eq!((&caps[1], &caps[2], &caps[3]), ("def.a", ":", "b:c"));
    }
}
