//! Turns generated source into a callable [`Template`].

use crate::settings::Settings;
use dot_eval::eval_program;
use dot_library::Value;
use dot_library::diag::{SourceResult, Trace, TracePoint, syntax_errors};
use dot_library::foundations::json::from_json;
use dot_syntax::Source;
use dot_syntax::ast::Program;
use ecow::EcoString;
use std::fmt;
use std::sync::Arc;

/// A compiled template.
///
/// Holds no compiler state, so it can be cloned cheaply, shared between
/// threads and rendered any number of times.
#[derive(Clone)]
pub struct Template {
    program: Arc<Program>,
    varname: EcoString,
    source: Source,
}

impl Template {
    /// Renders the template with `data` bound to the variable name.
    ///
    /// Arrays and objects in `data` are shared with the template, so changes
    /// made by `{{ }}` blocks are visible to the caller afterwards.
    pub fn render(&self, data: &Value) -> SourceResult<EcoString> {
        let output = eval_program(&self.program, [(self.varname.clone(), data.clone())])
            .trace(|| TracePoint::Render, self.program.span)?;
        Ok(output.to_js_string())
    }

    pub fn render_json(&self, data: &serde_json::Value) -> SourceResult<EcoString> {
        self.render(&from_json(data))
    }

    /// The generated source of the render function body.
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn varname(&self) -> &str {
        &self.varname
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function anonymous({}) {{{}}}", self.varname, self.source.text())
    }
}

/// Parses generated source into a template.
///
/// The source goes to the log sink of `settings` first, so it is seen even
/// when it does not parse.
pub fn instantiate(source: Source, settings: &Settings) -> SourceResult<Template> {
    if let Some(log) = &settings.log {
        log(source.text());
    }
    tracing::debug!(name = %source.name(), source = source.text(), "instantiating template");

    let program = dot_syntax::parse(source.text(), source.id()).map_err(syntax_errors)?;
    Ok(Template {
        program: Arc::new(program),
        varname: settings.varname.clone(),
        source,
    })
}
