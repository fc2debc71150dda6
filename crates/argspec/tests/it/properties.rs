use argspec::{
    ActionConfig, ArityMode, ConfigError, Conversion, ErrorKind, Namespace, Registry, Value,
};
use proptest::prelude::*;

fn numbers() -> Registry {
    Registry::build(|r| {
        r.register(ActionConfig::option(["--x"]).convert(Conversion::parse::<i64>()).default(7))?;
        r.register(
            ActionConfig::option(["--xs"])
                .arity(ArityMode::OneOrMore)
                .convert(Conversion::parse::<i64>()),
        )?;
        r.register(
            ActionConfig::option(["--maybe"])
                .arity(ArityMode::Optional)
                .constant(true)
                .default(false),
        )?;
        r.register(ActionConfig::positional("rest").arity(ArityMode::ZeroOrMore))?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn untriggered_actions_keep_defaults() {
    let ns = numbers().parse(Vec::<String>::new()).unwrap();
    assert_eq!(ns.len(), 4);
    assert_eq!(ns["x"], Value::Int(7));
    assert_eq!(ns["xs"], Value::None);
    assert_eq!(ns["maybe"], Value::Bool(false));
    assert_eq!(ns["rest"], Value::List(Vec::new()));
}

#[test]
fn single_arity_stores_a_converted_scalar() {
    let ns = numbers().parse(["--x", "5"]).unwrap();
    assert_eq!(ns["x"], Value::Int(5));
    assert_eq!(ns.get_as::<i64>("x"), Ok(5));
}

#[test]
fn one_or_more_needs_a_token() {
    let ns = numbers().parse(["--xs", "1", "2", "3"]).unwrap();
    assert_eq!(ns.get_as::<Vec<i64>>("xs"), Ok(vec![1, 2, 3]));

    let err = numbers().parse(["--xs"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingArgument);
    assert_eq!(err.arg(), Some("--xs"));
}

#[test]
fn optional_option_uses_const_then_default() {
    let r = numbers();
    assert_eq!(r.parse(["--maybe"]).unwrap()["maybe"], Value::Bool(true));
    assert_eq!(r.parse(Vec::<&str>::new()).unwrap()["maybe"], Value::Bool(false));
    assert_eq!(r.parse(["--maybe", "extra"]).unwrap()["maybe"], Value::from("extra"));
}

#[test]
fn conversion_failures_carry_the_token() {
    let err = numbers().parse(["a", "--x", "five"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidType);
    assert_eq!(err.position(), Some(2));
}

#[test]
fn duplicate_dest_is_rejected() {
    let mut r = numbers();
    let err = r.register(ActionConfig::option(["--other"]).dest("x")).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateDest("x".to_string()));
    assert_eq!(r.actions().len(), 4);
}

#[test]
fn required_arguments_are_listed_together() {
    let r = Registry::build(|r| {
        r.register(ActionConfig::option(["-a"]).required(true))?;
        r.register(ActionConfig::option(["-b", "--bee"]).required(true))?;
        Ok(())
    })
    .unwrap();
    let err = r.parse(["-a", "1"]).unwrap_err();
    assert_eq!(err.to_string(), "the following arguments are required: -b/--bee");
    let err = r.parse(Vec::<&str>::new()).unwrap_err();
    assert_eq!(err.to_string(), "the following arguments are required: -a, -b/--bee");
}

#[test]
fn parsing_is_repeatable() {
    let r = numbers();
    let args = ["--xs", "1", "2", "p", "--x", "3", "q"];
    let first = r.parse(args).unwrap();
    let second = r.parse(args).unwrap();
    assert_eq!(first, second);
}

#[test]
fn registries_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<Namespace>();

    let r = numbers();
    let results = std::thread::scope(|s| {
        let handles = (0..4)
            .map(|i| {
                let r = &r;
                s.spawn(move || r.parse(["--x".to_string(), i.to_string()]).unwrap())
            })
            .collect::<Vec<_>>();
        handles.into_iter().map(|it| it.join().unwrap()).collect::<Vec<_>>()
    });
    for (i, ns) in results.iter().enumerate() {
        assert_eq!(ns["x"], Value::Int(i as i64));
    }
}

proptest! {
    #[test]
    fn zero_or_more_positional_keeps_order(tokens in prop::collection::vec("[a-z0-9]{1,8}", 0..16)) {
        let ns = numbers().parse(&tokens).unwrap();
        let rest = ns.get_as::<Vec<String>>("rest").unwrap();
        prop_assert_eq!(rest, tokens);
    }

    #[test]
    fn parsing_is_deterministic(tokens in prop::collection::vec("--xs|--x|--maybe|-?[0-9]{1,3}|[a-z]{1,4}", 0..12)) {
        let r = numbers();
        prop_assert_eq!(r.parse(&tokens), r.parse(&tokens));
        prop_assert_eq!(r.parse_known(&tokens), r.parse_known(&tokens));
    }
}
