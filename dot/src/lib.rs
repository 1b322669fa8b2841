//! Compiles doT-style templates into render functions.
//!
//! ```ignore
//! let template = dot::compile_template("Hi {{=it.name}}!", &SettingsOverride::new())?;
//! assert_eq!(template.render_json(&json!({ "name": "Ada" }))?, "Hi Ada!");
//! ```
//!
//! A template is compiled in stages: define and use directives are resolved,
//! whitespace is stripped, the remaining directives are lexed into
//! instructions that are generated into script source, and that source is
//! finalized and parsed into a [`Template`].

pub mod definitions;
pub mod finalize;
pub mod instantiate;
pub mod resolve;
pub mod settings;
pub mod transform;

#[cfg(test)]
mod test;

pub use definitions::{Definition, Definitions, ExpansionCache, ExpansionKey};
pub use instantiate::Template;
pub use settings::{Directive, LogSink, Settings, SettingsOverride};

use dot_library::diag::{SourceResult, bail};
use dot_syntax::{FileId, Source, Span};
use dot_utils::trace_fn;
use ecow::EcoString;

/// The name templates compiled from strings are known by in diagnostics.
pub const TEMPLATE_NAME: &str = "<template>";

/// Compiles `text` with the baseline settings and no definitions.
pub fn compile_template(text: &str, overrides: &SettingsOverride) -> SourceResult<Template> {
    Compiler::new().compile(text, overrides)
}

/// Compiles `text` with the baseline settings, resolving uses against `defs`
/// and adding the template's defines to it.
pub fn compile_template_with_defs(
    text: &str,
    defs: &mut Definitions,
    overrides: &SettingsOverride,
) -> SourceResult<Template> {
    Compiler::new().compile_with_defs(text, defs, overrides)
}

/// Compiles templates against its own default settings.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    defaults: Settings,
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_defaults(Settings::baseline().clone())
    }

    pub fn with_defaults(defaults: Settings) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    pub fn compile(&self, text: &str, overrides: &SettingsOverride) -> SourceResult<Template> {
        self.compile_with_defs(text, &mut Definitions::new(), overrides)
    }

    pub fn compile_with_defs(
        &self,
        text: &str,
        defs: &mut Definitions,
        overrides: &SettingsOverride,
    ) -> SourceResult<Template> {
        self.compile_named(TEMPLATE_NAME, text, defs, overrides)
    }

    /// Compiles `text` as the template file `name`.
    ///
    /// Diagnostics point into a source called `name`, so callers that build
    /// `Source::from_string(name, text)` themselves can render them.
    pub fn compile_named(
        &self,
        name: &str,
        text: &str,
        defs: &mut Definitions,
        overrides: &SettingsOverride,
    ) -> SourceResult<Template> {
        let settings = self.defaults.merge(overrides);
        let source = self.generate_with(name, text, defs, &settings)?;
        instantiate::instantiate(source, &settings)
    }

    /// Runs every stage except instantiation and returns the generated source.
    pub fn generate(
        &self,
        text: &str,
        defs: &mut Definitions,
        overrides: &SettingsOverride,
    ) -> SourceResult<Source> {
        self.generate_named(TEMPLATE_NAME, text, defs, overrides)
    }

    /// Like [`Compiler::generate`], with `name` as the template's file name in
    /// diagnostics. The generated source is named `{name}.js`.
    pub fn generate_named(
        &self,
        name: &str,
        text: &str,
        defs: &mut Definitions,
        overrides: &SettingsOverride,
    ) -> SourceResult<Source> {
        let settings = self.defaults.merge(overrides);
        self.generate_with(name, text, defs, &settings)
    }

    fn generate_with(
        &self,
        name: &str,
        text: &str,
        defs: &mut Definitions,
        settings: &Settings,
    ) -> SourceResult<Source> {
        trace_fn!("generate_template", "{}", name);
        let template = Source::new(intern(name)?, text.to_string());

        let resolved: EcoString = if settings.resolves_definitions() {
            resolve::resolve(&template, settings, defs)?
        } else {
            text.into()
        };

        let stripped = if settings.strip {
            transform::strip(&resolved)
        } else {
            resolved
        };

        let instructions = transform::lex(&stripped, settings);
        tracing::trace!(?instructions, "lexed directives");
        let body = transform::generate(&instructions, settings)?;
        let source = finalize::finalize(&body);

        Ok(Source::new(intern(&format!("{name}.js"))?, source.to_string()))
    }
}

/// The file id for `name`, or an error once the process ran out of ids.
pub(crate) fn intern(name: &str) -> SourceResult<FileId> {
    match FileId::try_new(name) {
        Some(id) => Ok(id),
        None => bail!(
            Span::detached(),
            "cannot compile `{}`: too many distinct file names in this process", name;
            hint: "reuse template names instead of generating a new one per call"
        ),
    }
}
