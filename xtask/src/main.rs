#[cfg(test)]
mod tidy;

use std::{thread, time::Duration, time::Instant};

use xshell::{cmd, Shell};

/// Publish order: `argspec` pins the exact `argspec-macros` version.
const CRATES: [&str; 2] = ["argspec-macros", "argspec"];

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    step("test", || {
        cmd!(sh, "cargo test --workspace").run()?;
        cmd!(sh, "cargo test -p argspec --features serde").run()?;
        cmd!(sh, "cargo run -p argspec --example grep -- -i -A 2 foo src/lib.rs").run()
    })?;

    let version = cmd!(sh, "cargo pkgid -p argspec").read()?;
    let version = version.rsplit(['#', '@']).next().unwrap_or_default().to_string();
    let on_master = cmd!(sh, "git branch --show-current").read()? == "master";
    let released = !cmd!(sh, "git tag --list v{version}").read()?.trim().is_empty();
    if !on_master || released {
        return Ok(());
    }

    step("publish", || {
        cmd!(sh, "git tag v{version}").run()?;
        for krate in CRATES {
            cmd!(sh, "cargo publish -p {krate}").run()?;
            wait_until_published(&sh, krate, &version)?;
        }
        cmd!(sh, "git push --tags").run()
    })
}

fn step(name: &str, f: impl FnOnce() -> xshell::Result<()>) -> xshell::Result<()> {
    println!("::group::{name}");
    let start = Instant::now();
    let res = f();
    eprintln!("{name}: {:.2?}", start.elapsed());
    println!("::endgroup::");
    res
}

fn wait_until_published(sh: &Shell, krate: &str, version: &str) -> xshell::Result<()> {
    for _ in 0..100 {
        let stderr = cmd!(sh, "cargo install {krate} --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;
        if stderr.contains("Installing") {
            break;
        }
        thread::sleep(Duration::from_secs(3));
    }
    Ok(())
}
