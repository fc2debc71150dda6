use argspec::{ActionConfig, ActionKind, Conversion, Namespace, Registry, Value};
use expect_test::expect;

#[test]
fn namespace_round_trips_through_json() {
    let registry = Registry::build(|r| {
        r.register(ActionConfig::flag(["--dry-run"]))?;
        r.register(ActionConfig::count(["-v"]))?;
        r.register(ActionConfig::option(["--ratio"]).convert(Conversion::parse::<f64>()))?;
        r.register(ActionConfig::option(["-I"]).kind(ActionKind::Append))?;
        r.register(ActionConfig::option(["--missing"]))?;
        r.register(ActionConfig::positional("name"))?;
        Ok(())
    })
    .unwrap();
    let ns = registry.parse(["-vv", "--ratio", "2", "-I", "a", "-I", "b", "x"]).unwrap();

    let json = serde_json::to_string(&ns).unwrap();
    expect![[r#"{"I":["a","b"],"dry_run":false,"missing":null,"name":"x","ratio":2.0,"v":2}"#]]
        .assert_eq(&json);

    let back = serde_json::from_str::<Namespace>(&json).unwrap();
    assert_eq!(back, ns);
    assert_eq!(back["ratio"], Value::Float(2.0));
    assert_eq!(back["v"], Value::Int(2));
}

#[test]
fn untagged_values() {
    let value = serde_json::from_str::<Value>(r#"[1, 1.5, null, "s", true, []]"#).unwrap();
    expect![[r#"[1, 1.5, None, "s", true, []]"#]].assert_eq(&format!("{value:?}"));
}
