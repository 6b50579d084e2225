use std::process::Command;

/// Expose `APP_VERSION` to the binary: the nearest git tag, or the crate version.
fn main() {
    let version = describe_tag().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=APP_VERSION={version}");

    for path in [".git/HEAD", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={path}");
    }
}

fn describe_tag() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let tag = String::from_utf8(output.stdout).ok()?;
    let tag = tag.trim();
    Some(tag.trim_start_matches('v').to_string()).filter(|v| !v.is_empty())
}
