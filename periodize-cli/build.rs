//! Stamps the binary with the commit it was built from.
//!
//! Packagers building outside a checkout can set `PERIODIZE_BUILD_SHA`
//! themselves; otherwise the short HEAD hash is used, then "unknown".

use std::path::{Path, PathBuf};
use std::process::Command;

const SHA_VAR: &str = "PERIODIZE_BUILD_SHA";

fn workspace_root() -> PathBuf {
    let manifest = std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from);
    manifest
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

fn head_sha(root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let root = workspace_root();
    let sha = std::env::var(SHA_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| head_sha(&root))
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-changed={}", root.join(".git/HEAD").display());
}
