use crate::test::{codes, compile, compile_defs, render};
use crate::{
    Definition, Definitions, Directive, SettingsOverride, compile_template,
    compile_template_with_defs,
};
use dot_error_codes::{E0005_UNDEFINED_VARIABLE, E0010_DEFINE_RECURSION};
use dot_library::Value;
use serde_json::json;

#[track_caller]
fn assert_renders_foo(text: &str, defs: &mut Definitions) {
    let template = compile_defs(text, defs);
    assert_eq!(render(&template, json!({ "foo": "http" })), "http");
    assert_eq!(render(&template, json!({})), "undefined");
}

#[test]
fn define_without_parameters() {
    assert_renders_foo("{{##def.tmp:{{=it.foo}}#}}{{#def.tmp}}", &mut Definitions::new());
}

#[test]
fn define_passed_in_by_the_caller() {
    let mut defs = Definitions::new().with_text("tmp", "{{=it.foo}}");
    assert_renders_foo("{{#def.tmp}}", &mut defs);
}

#[test]
fn inline_and_external_defines_render_the_same() {
    let inline = compile("{{##def.greet:Hi {{=it.name}}#}}<p>{{#def.greet}}</p>");
    let mut defs = Definitions::new().with_text("greet", "Hi {{=it.name}}");
    let external = compile_defs("<p>{{#def.greet}}</p>", &mut defs);

    let data = json!({ "name": "Ada" });
    assert_eq!(render(&inline, data.clone()), render(&external, data));
}

#[test]
fn define_with_parameter() {
    assert_renders_foo(
        "{{##def.tmp:foo:{{=foo}}#}}{{ var bar = it.foo; }}{{# def.tmp:bar }}",
        &mut Definitions::new(),
    );
}

#[test]
fn parameterized_define_used_with_two_arguments() {
    let template = compile(
        "{{##def.show:x:<{{=x}}>#}}{{ var a = it.a, b = it.b; }}{{#def.show:a}}{{#def.show:b}}{{#def.show:a}}",
    );
    assert_eq!(render(&template, json!({ "a": 1, "b": 2 })), "<1><2><1>");
}

#[test]
fn defines_are_added_to_the_callers_map() {
    let mut defs = Definitions::new();
    compile_defs("{{##def.a:text#}}{{##def.b:x:{{=x}}#}}{{##def.n = 40 + 2#}}", &mut defs);

    assert_eq!(defs.get("a"), Some(&Definition::Text("text".into())));
    assert_eq!(
        defs.get("b"),
        Some(&Definition::Snippet {
            param: "x".into(),
            body: "{{=x}}".into()
        })
    );
    assert_eq!(defs.get("n"), Some(&Definition::Value(Value::from(42.0))));
}

#[test]
fn first_define_wins() {
    let mut defs = Definitions::new().with_text("a", "caller");
    let template = compile_defs("{{##def.a:template#}}{{#def.a}}", &mut defs);
    assert_eq!(render(&template, json!({})), "caller");
}

#[test]
fn computed_define_can_read_other_defines() {
    let template = compile("{{##def.base:ab#}}{{##def.twice = def.base + def.base#}}{{#def.twice}}");
    assert_eq!(render(&template, json!({})), "abab");
}

#[test]
fn defines_chain_through_uses() {
    let template = compile("{{##def.inner:[{{=it.x}}]#}}{{##def.outer:({{#def.inner}})#}}{{#def.outer}}");
    assert_eq!(render(&template, json!({ "x": 1 })), "([1])");
}

#[test]
fn falsy_use_is_spliced_as_text() {
    let template = compile("{{##def.zero = 0#}}{{#def.zero}}|{{#def.missing}}");
    assert_eq!(render(&template, json!({})), "0|undefined");
}

#[test]
fn self_referential_define_is_an_error() {
    let errors = compile_template("{{##def.a:{{#def.a}}#}}{{#def.a}}", &SettingsOverride::new())
        .unwrap_err();
    assert_eq!(codes(&errors), vec![&E0010_DEFINE_RECURSION]);
}

#[test]
fn broken_use_code_is_a_compile_error() {
    let errors = compile_template("{{#nowhere.x}}", &SettingsOverride::new()).unwrap_err();
    assert_eq!(codes(&errors), vec![&E0005_UNDEFINED_VARIABLE]);
    assert!(!errors[0].trace.is_empty());
}

#[test]
fn disabled_define_and_use_leave_the_text_alone() {
    let text = "{{##def.a:x#}}{{#def.a}}";
    let overrides = SettingsOverride::new()
        .disable(Directive::Define)
        .disable(Directive::Use)
        .disable(Directive::Evaluate);
    let mut defs = Definitions::new();

    let template = compile_template_with_defs(text, &mut defs, &overrides).unwrap();

    assert_eq!(render(&template, json!({})), text);
    assert!(defs.is_empty());
}

#[test]
fn computed_defines_share_one_file() {
    let file_of = |text: &str| {
        let errors = compile_template(text, &SettingsOverride::new()).unwrap_err();
        assert_eq!(codes(&errors), vec![&E0005_UNDEFINED_VARIABLE]);
        errors[0].span.id()
    };

    let first = file_of("{{##def.first = nowhere#}}");
    let second = file_of("{{##def.second = nowhere#}}");
    assert!(first.is_some());
    assert_eq!(first, second);
}
