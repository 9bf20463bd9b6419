//! Behavioural properties of compiled rendering plans: substitution,
//! determinism, empty fields, missing variables and concurrent reuse.

use std::sync::Arc;

use herald_core::{Notification, OpsgenieSpec};
use herald_renderer::{compile, RenderError, RenderingPlan, Templater, Vars};
use rstest::rstest;
use serde_json::json;

fn spec(yaml: &str) -> OpsgenieSpec {
    serde_yaml::from_str(yaml).expect("valid spec")
}

fn render(plan: &RenderingPlan, vars: &Vars) -> Result<Notification, RenderError> {
    let mut n = Notification::default();
    plan.render(&mut n, vars)?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// 1. Substitution
// ---------------------------------------------------------------------------

#[rstest]
#[case::plain("P1", json!({}), "P1")]
#[case::variable("svc-{{ name }}", json!({ "name": "checkout" }), "svc-checkout")]
#[case::nested("{{ app.name }}/{{ app.env }}", json!({ "app": { "name": "api", "env": "prod" } }), "api/prod")]
#[case::number("{{ replicas }} pods", json!({ "replicas": 3 }), "3 pods")]
#[case::filter("{{ name | upper }}", json!({ "name": "db" }), "DB")]
#[case::default_filter("{{ owner | default(value=\"none\") }}", json!({}), "none")]
fn alias_renders_to_direct_substitution(
    #[case] template: &str,
    #[case] vars: serde_json::Value,
    #[case] expected: &str,
) {
    let yaml = format!("schema: structured\nalias: {}\n", serde_json::to_string(template).unwrap());
    let plan = compile(&spec(&yaml)).expect("compile");
    let vars = Vars::from_serialize(&vars).expect("vars");
    let n = render(&plan, &vars).expect("render");
    assert_eq!(n.opsgenie.unwrap().alias, expected);
}

#[test]
fn end_to_end_alias_and_priority() {
    let plan = compile(&spec(
        "schema: structured\nalias: \"svc-{{ name }}\"\npriority: P1\n",
    ))
    .expect("compile");
    let n = render(&plan, &Vars::new().with("name", "checkout")).expect("render");
    let payload = n.opsgenie.expect("payload");
    assert_eq!(payload.alias, "svc-checkout");
    assert_eq!(payload.priority, "P1");
}

// ---------------------------------------------------------------------------
// 2. Determinism and empty fields
// ---------------------------------------------------------------------------

#[rstest]
#[case::structured("schema: structured\nalias: \"{{ a }}\"\nnote: \"{% for t in ts %}{{ t }} {% endfor %}\"\ntags: [x, y]\n")]
#[case::templated("schema: templated\nalias: \"{{ a }}\"\ntags: \"{{ ts | join(sep=\\\",\\\") }}\"\n")]
fn compiling_twice_renders_identically(#[case] yaml: &str) {
    let s = spec(yaml);
    let first = compile(&s).expect("compile 1");
    let second = compile(&s).expect("compile 2");
    let vars = Vars::new().with("a", "x").with("ts", json!(["p", "q"]));
    assert_eq!(
        render(&first, &vars).expect("render 1"),
        render(&second, &vars).expect("render 2")
    );
}

#[rstest]
#[case::no_vars(Vars::new())]
#[case::unrelated_vars(Vars::new().with("description", "ignored").with("n", 1))]
fn empty_fields_render_empty(#[case] vars: Vars) {
    let plan = compile(&spec("schema: templated\n")).expect("compile");
    assert_eq!(plan.fields().count(), 0);
    let payload = render(&plan, &vars).expect("render").opsgenie.expect("payload");
    assert_eq!(payload, Default::default());
}

// ---------------------------------------------------------------------------
// 3. Missing variables
// ---------------------------------------------------------------------------

#[test]
fn missing_variable_is_a_render_error() {
    let plan = compile(&spec(
        "schema: structured\nalias: \"svc-{{ name }}\"\n",
    ))
    .expect("compile");
    let err = render(&plan, &Vars::new().with("other", 1)).unwrap_err();
    match err {
        RenderError::Field { field, detail, .. } => {
            assert_eq!(field, "alias");
            assert!(detail.contains("name"), "got: {detail}");
        }
        other => panic!("expected RenderError::Field, got {other}"),
    }
}

#[test]
fn type_mismatch_is_a_render_error() {
    let plan = compile(&spec(
        "schema: structured\nnote: \"{{ count + 1 }}\"\n",
    ))
    .expect("compile");
    let err = render(&plan, &Vars::new().with("count", "not-a-number")).unwrap_err();
    assert!(matches!(err, RenderError::Field { ref field, .. } if field == "note"), "got: {err}");
}

// ---------------------------------------------------------------------------
// 4. Concurrent reuse
// ---------------------------------------------------------------------------

#[test]
fn concurrent_renders_do_not_cross_contaminate() {
    let plan = Arc::new(
        compile(&spec(
            "schema: structured\nalias: \"svc-{{ name }}\"\nnote: \"{% for i in range(end=n) %}{{ name }}{% endfor %}\"\n",
        ))
        .expect("compile"),
    );

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let plan = Arc::clone(&plan);
            std::thread::spawn(move || {
                let name = format!("svc{i}");
                let vars = Vars::new().with("name", name.clone()).with("n", 3);
                let mut n = Notification::default();
                for _ in 0..50 {
                    plan.render(&mut n, &vars).expect("render");
                }
                (name, n)
            })
        })
        .collect();

    for handle in handles {
        let (name, n) = handle.join().expect("thread");
        let payload = n.opsgenie.expect("payload");
        assert_eq!(payload.alias, format!("svc-{name}"));
        assert_eq!(payload.note, name.repeat(3));
    }
}
