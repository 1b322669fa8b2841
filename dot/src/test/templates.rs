use crate::test::{codes, compile, compile_err, compile_with, render};
use crate::{Directive, SettingsOverride};
use dot_error_codes::{E0004_EXPECTED_EXPRESSION, E0007_PROPERTY_OF_NOTHING, E0011_INVALID_ESCAPE};
use dot_library::Value;
use dot_library::foundations::Object;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[test]
fn text_without_directives_renders_unchanged() {
    let text = "Line one\n\tindented `ticks` \\ back\\slash ${not code} /* kept */\r\n";
    let template = compile_with(text, SettingsOverride::new().strip(false));

    assert_eq!(render(&template, json!({})), text);
    assert_eq!(render(&template, json!({ "anything": [1, 2] })), text);
}

#[test]
fn adjacent_interpolations() {
    for text in [
        "{{=it.one}}{{=it.two}}",
        "{{= it.one}}{{= it.two}}",
        "{{= it.one }}{{= it.two }}",
    ] {
        assert_eq!(render(&compile(text), json!({ "one": 1, "two": 2 })), "12");
    }
}

#[test]
fn evaluate_runs_before_later_interpolations() {
    let template = compile("{{ it.one = 1; it.two = 2; }}{{= it.one }}{{= it.two }}");
    assert_eq!(render(&template, json!({})), "12");
}

#[test]
fn evaluate_mutates_the_callers_data() {
    let template = compile("{{ it.seen = true; }}");
    let data = Object::new();
    template.render(&Value::Object(data.clone())).unwrap();
    assert_eq!(data.get("seen"), Some(Value::Bool(true)));
}

#[test]
fn invalid_code_fails_to_compile() {
    let errors = compile_err("<div>{{= foo + }}</div>");
    assert_eq!(codes(&errors), vec![&E0004_EXPECTED_EXPRESSION]);
}

#[test]
fn missing_field_renders_undefined() {
    let template = compile(r#"{"foo": "{{=it.foo}}"}"#);
    assert_eq!(render(&template, json!({ "foo": "http" })), r#"{"foo": "http"}"#);
    assert_eq!(render(&template, json!({})), r#"{"foo": "undefined"}"#);
}

#[test]
fn missing_object_is_a_render_error() {
    let template = compile("{{=it.a.b}}");
    let errors = template.render_json(&json!({})).unwrap_err();
    assert_eq!(codes(&errors), vec![&E0007_PROPERTY_OF_NOTHING]);
}

#[test]
fn compiling_twice_is_deterministic() {
    let text = "{{~it.items :item:i}}{{=i}}={{=item}};{{~}}";
    let (a, b) = (compile(text), compile(text));
    let data = json!({ "items": ["x", "y"] });

    assert_eq!(a.source().text(), b.source().text());
    assert_eq!(render(&a, data.clone()), render(&b, data));
}

#[test]
fn unmatched_directive_is_text() {
    assert_eq!(render(&compile("a {{= it.x"), json!({})), "a {{= it.x");
}

#[test]
fn disabled_directive_is_text() {
    let template = compile_with(
        "{{=it.x}}{{ nope }}",
        SettingsOverride::new()
            .disable(Directive::Interpolate)
            .disable(Directive::Evaluate),
    );
    assert_eq!(render(&template, json!({ "x": 1 })), "{{=it.x}}{{ nope }}");
}

#[test]
fn conditional_branches() {
    let template = compile("{{? it.n > 1 }}many{{?? it.n == 1}}one{{??}}none{{?}}!");
    assert_eq!(render(&template, json!({ "n": 5 })), "many!");
    assert_eq!(render(&template, json!({ "n": 1 })), "one!");
    assert_eq!(render(&template, json!({ "n": 0 })), "none!");
}

#[test]
fn multiline_conditions() {
    let template = compile_with(
        "{{? it.a &&\n it.b }}both{{?? it.a ||\n\t it.b}}one{{?}}",
        SettingsOverride::new().strip(false),
    );
    assert_eq!(render(&template, json!({ "a": true, "b": true })), "both");
    assert_eq!(render(&template, json!({ "a": false, "b": true })), "one");
}

#[test]
fn iteration() {
    let template = compile("{{~it.list :v:i}}{{=i}}{{=v}}{{~}}");
    assert_eq!(render(&template, json!({ "list": ["a", "b", "c"] })), "0a1b2c");
}

#[test]
fn nested_and_sibling_loops_do_not_collide() {
    let template = compile(
        "{{~it.rows :row}}[{{~row :cell:i}}{{=i}}{{=cell}}{{~}}]{{~}}|{{~it.rows :row:i}}{{=i}}{{~}}",
    );
    assert_eq!(
        render(&template, json!({ "rows": [["a", "b"], ["c"]] })),
        "[0a1b][0c]|01"
    );
}

#[test]
fn raw_literals() {
    assert_eq!(render(&compile("a{{!}}b"), json!({})), "a\nb");
    assert_eq!(render(&compile("a{{!\\t}}b"), json!({})), "a\tb");
    let template = compile_with("a{{!}}b", SettingsOverride::new().newline("<br>"));
    assert_eq!(render(&template, json!({})), "a<br>b");
}

#[test]
fn invalid_raw_escape_fails_to_compile() {
    let errors = compile_err("a{{!\\q}}b");
    assert_eq!(codes(&errors), vec![&E0011_INVALID_ESCAPE]);
}

#[test]
fn dollar_next_to_a_raw_brace_is_not_code() {
    let template = compile_with("${{!{}}it.x}", SettingsOverride::new().strip(false));
    assert_eq!(render(&template, json!({ "x": "INJECTED" })), "${it.x}");
}

#[test]
fn self_containing_array_interpolates() {
    let template = compile("{{ var a = [1]; a.push(a); }}{{=a}}|{{=a.join('-')}}");
    assert_eq!(render(&template, json!({})), "1,|1-");
}

#[test]
fn special_characters_survive() {
    let text = r"`code` \n ${x} \\";
    assert_eq!(render(&compile(text), json!({ "x": 1 })), text);
}

#[test]
fn tstring_renders_like_concatenation() {
    let text = "<p>{{=it.a}} {{? it.b}}{{=it.b}}{{?}}</p>{{~it.c :x}}{{=x}}{{~}}";
    let data = json!({ "a": "A", "b": 2, "c": [1, 2] });
    let concatenated = compile(text);
    let interpolated = compile_with(text, SettingsOverride::new().tstring(true));

    assert!(interpolated.source().text().contains("${it.a}"));
    assert_eq!(render(&concatenated, data.clone()), render(&interpolated, data));
}

#[test]
fn strip_collapses_whitespace() {
    let template = compile("<ul>\n    {{~it.l :x}}\n    <li>{{=x}}</li>\n    {{~}}\n</ul>");
    assert_eq!(render(&template, json!({ "l": [1] })), "<ul>  <li>1</li> </ul>");
}

#[test]
fn log_sink_receives_the_source() {
    let seen = Arc::new(Mutex::new(vec![]));
    let sink = seen.clone();
    let template = compile_with(
        "{{=it.x}}",
        SettingsOverride::new().log(move |source| sink.lock().unwrap().push(source.to_string())),
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [template.source().text().to_string()]);
}

#[test]
fn custom_varname() {
    let template = compile_with("{{=data.x}}", SettingsOverride::new().varname("data"));
    assert_eq!(template.varname(), "data");
    assert_eq!(render(&template, json!({ "x": "y" })), "y");
}

#[test]
fn generated_source_shape() {
    let template = compile("Hi {{=it.name}}!");
    assert_eq!(template.source().text(), "let out=`Hi `+(it.name)+`!`;return out;");
}

#[test]
fn templates_render_on_other_threads() {
    let template = compile("{{=it.n * 2}}");
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let template = template.clone();
            std::thread::spawn(move || render(&template, json!({ "n": n })))
        })
        .collect();
    let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs, ["0", "2", "4", "6"]);
}
