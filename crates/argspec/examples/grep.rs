use std::{path::PathBuf, process};

fn main() {
    let registry = match argspec::actions! {
        /// Ignore case distinctions.
        flag -i, --ignore-case
        /// Print NUM lines of trailing context.
        optional -A, --after-context num: u32 default 0
        /// Additional patterns.
        append -e, --regexp pattern: String
        positional pattern: String
        positional files: PathBuf nargs *
    } {
        Ok(it) => it,
        Err(err) => {
            eprintln!("grep: {err}");
            process::exit(2)
        }
    };

    let ns = match registry.parse(std::env::args().skip(1)) {
        Ok(it) => it,
        Err(err) => {
            eprintln!("grep: {err}");
            process::exit(2)
        }
    };

    let mut patterns = ns.get_as::<Vec<String>>("regexp").unwrap_or_default();
    patterns.insert(0, ns["pattern"].to_string());
    println!(
        "searching {} file(s) for {:?}{}, {} line(s) of context",
        ns["files"].as_list().map_or(0, |it| it.len()),
        patterns,
        if ns["ignore_case"].as_bool() == Some(true) { " ignoring case" } else { "" },
        ns["after_context"],
    );
}
