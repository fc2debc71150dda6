use std::path::{Path, PathBuf};

use xshell::Shell;

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn version_of(manifest: &str) -> String {
    let line = manifest.lines().find(|it| it.starts_with("version = ")).unwrap();
    line.split('"').nth(1).unwrap().to_string()
}

#[test]
fn versions_are_in_sync() {
    let sh = Shell::new().unwrap();
    let root = project_root();

    let workspace = version_of(&sh.read_file(root.join("Cargo.toml")).unwrap());
    let manifest = sh.read_file(root.join("crates/argspec/Cargo.toml")).unwrap();
    let runtime = version_of(&manifest);
    let pin = manifest
        .lines()
        .find(|it| it.starts_with("argspec-macros = "))
        .and_then(|it| it.split("version = \"=").nth(1))
        .and_then(|it| it.split('"').next())
        .unwrap();

    assert_eq!(workspace, runtime, "crates/argspec/Cargo.toml is out of date");
    assert_eq!(workspace, pin, "argspec-macros pin is out of date");
}

#[test]
fn sources_are_tidy() {
    let sh = Shell::new().unwrap();
    let mut stack = vec![project_root().join("crates"), project_root().join("xtask/src")];
    let dbg = concat!("dbg", "!(");
    let mut checked = 0;
    while let Some(dir) = stack.pop() {
        for path in sh.read_dir(&dir).unwrap() {
            if path.is_dir() {
                if path.file_name().map_or(false, |it| it != "target") {
                    stack.push(path);
                }
                continue;
            }
            if path.extension().map_or(true, |it| it != "rs") {
                continue;
            }
            let text = sh.read_file(&path).unwrap();
            for (i, line) in text.lines().enumerate() {
                let at = format!("{}:{}", path.display(), i + 1);
                assert!(!line.ends_with(' '), "trailing whitespace at {at}");
                assert!(!line.contains(dbg), "leftover dbg! at {at}");
                assert!(!line.contains('\t'), "tab at {at}");
            }
            checked += 1;
        }
    }
    assert!(checked > 10);
}
