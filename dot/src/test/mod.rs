use crate::{Definitions, SettingsOverride, Template, compile_template, compile_template_with_defs};
use dot_error_codes::ErrorCode;
use dot_library::diag::SourceDiagnostic;
use ecow::EcoVec;

mod defines;
mod templates;

#[track_caller]
pub fn compile(text: &str) -> Template {
    compile_with(text, SettingsOverride::new())
}

#[track_caller]
pub fn compile_with(text: &str, overrides: SettingsOverride) -> Template {
    match compile_template(text, &overrides) {
        Ok(template) => template,
        Err(errors) => panic!("failed to compile {text:?}: {errors:?}"),
    }
}

#[track_caller]
pub fn compile_defs(text: &str, defs: &mut Definitions) -> Template {
    match compile_template_with_defs(text, defs, &SettingsOverride::new()) {
        Ok(template) => template,
        Err(errors) => panic!("failed to compile {text:?}: {errors:?}"),
    }
}

/// Compiles `text`, expecting it to fail.
#[track_caller]
pub fn compile_err(text: &str) -> EcoVec<SourceDiagnostic> {
    match compile_template(text, &SettingsOverride::new()) {
        Ok(template) => panic!("expected {text:?} to fail, got {}", template.source().text()),
        Err(errors) => errors,
    }
}

/// Renders `template` with JSON `data`.
#[track_caller]
pub fn render(template: &Template, data: serde_json::Value) -> String {
    match template.render_json(&data) {
        Ok(output) => output.to_string(),
        Err(errors) => panic!(
            "failed to render {}: {errors:?}",
            template.source().text()
        ),
    }
}

pub fn codes(errors: &[SourceDiagnostic]) -> Vec<&'static ErrorCode> {
    errors.iter().filter_map(|error| error.code).collect()
}
