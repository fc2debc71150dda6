use std::path::PathBuf;

use argspec::Registry;
use expect_test::{expect, Expect};

fn check(registry: &Registry, args: &str, expect: Expect) {
    let args = args.split_ascii_whitespace().collect::<Vec<_>>();
    match registry.parse(args) {
        Ok(ns) => expect.assert_debug_eq(&ns),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

fn rust_analyzer() -> Registry {
    argspec::actions! {
        /// Number of concurrent jobs.
        optional -j, --jobs n: u32
        /// Path to log file. By default, logs go to stderr.
        optional --log-file path: PathBuf
        count -v, --verbose default 0
        required -n, --number n: i64
        append --data value: String
        flag --emoji
        positional workspace: PathBuf
    }
    .unwrap()
}

#[test]
fn smoke() {
    check(
        &rust_analyzer(),
        "-n 92 .",
        expect![[r#"
            {
                "data": None,
                "emoji": false,
                "jobs": None,
                "log_file": None,
                "number": 92,
                "verbose": 0,
                "workspace": ".",
            }
        "#]],
    );
    check(
        &rust_analyzer(),
        "-n 92 -v --verbose -v --data 0xDEAD --log-file /tmp/log.txt --data 0xBEEF .",
        expect![[r#"
            {
                "data": [
                    "0xDEAD",
                    "0xBEEF",
                ],
                "emoji": false,
                "jobs": None,
                "log_file": "/tmp/log.txt",
                "number": 92,
                "verbose": 3,
                "workspace": ".",
            }
        "#]],
    );
    check(
        &rust_analyzer(),
        "--emoji -j 4 -n 1 .",
        expect![[r#"
            {
                "data": None,
                "emoji": true,
                "jobs": 4,
                "log_file": None,
                "number": 1,
                "verbose": 0,
                "workspace": ".",
            }
        "#]],
    );
    check(&rust_analyzer(), "-n 92", expect!["argument workspace: expected one argument"]);
    check(&rust_analyzer(), ".", expect!["the following arguments are required: -n/--number"]);
    check(
        &rust_analyzer(),
        "-n 1 -j -4 .",
        expect!["argument -j/--jobs: invalid u32 value: '-4' (invalid digit found in string)"],
    );
}

#[test]
fn docs_become_help() {
    let registry = rust_analyzer();
    let help = registry.actions().iter().map(|it| it.help()).collect::<Vec<_>>();
    expect![[r#"
        [
            Some(
                "Number of concurrent jobs.",
            ),
            Some(
                "Path to log file. By default, logs go to stderr.",
            ),
            None,
            None,
            None,
            None,
            None,
        ]
    "#]]
    .assert_debug_eq(&help);
    assert_eq!(registry.get("jobs").and_then(|it| it.metavar()), Some("n"));
}

#[test]
fn modifiers() {
    let registry = argspec::actions! {
        optional --level n: i64 choices [1, 2, 3] default 1
        optional --color choices ["auto", "never"] nargs ? const "auto" default "never"
        optional --point x: f64 nargs 2 dest coords
        positional cmd
        positional rest nargs ...
    };
    let registry = registry.unwrap_or_else(|err| panic!("{err}"));
    check(
        &registry,
        "--color --point 1 2 run --level 9",
        expect![[r#"
            {
                "cmd": "run",
                "color": "auto",
                "coords": [
                    1.0,
                    2.0,
                ],
                "level": 1,
                "rest": [
                    "--level",
                    "9",
                ],
            }
        "#]],
    );
    check(
        &registry,
        "--level 9 run",
        expect!["argument --level: invalid choice: 9 (choose from 1, 2, 3)"],
    );
}

#[test]
fn registration_errors_surface_at_runtime() {
    let res = argspec::actions! {
        flag --quiet
        optional -q dest quiet
    };
    expect!["dest `quiet` is already registered"].assert_eq(&res.unwrap_err().to_string());
}
