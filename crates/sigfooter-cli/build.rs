//! Exposes the short commit hash as `GIT_HASH` for `--version`.

use std::process::Command;

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", short_commit().unwrap_or_else(|| "unknown".into()));
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}

/// `None` outside a git checkout or when git is not installed.
fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string()).filter(|h| !h.is_empty())
}
