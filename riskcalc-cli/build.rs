// Injects RISKCALC_VERSION for `riskcalc --version`.
//
// Tagged builds report the tag ("v0.2.0" -> "0.2.0"); untagged builds append
// the abbreviated commit to the package version. Without git the package
// version is used as-is.

use std::process::Command;

fn main() {
    let package_version = env!("CARGO_PKG_VERSION");
    let version = git_describe()
        .map(|described| version_from_describe(package_version, &described))
        .unwrap_or_else(|| package_version.to_string());

    println!("cargo:rustc-env=RISKCALC_VERSION={}", version);
    for watched in [".git/HEAD", ".git/refs/heads", ".git/refs/tags"] {
        println!("cargo:rerun-if-changed={}", watched);
    }
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8(output.stdout).ok()?;
    Some(described.trim().to_string()).filter(|d| !d.is_empty())
}

fn version_from_describe(package_version: &str, described: &str) -> String {
    match described.strip_prefix('v') {
        // "v0.2.0" or "v0.2.0-5-gabc123[-dirty]": keep the tag part
        Some(tagged) => tagged.split('-').next().unwrap_or(tagged).to_string(),
        // bare commit such as "abc123" or "abc123-dirty"
        None => format!("{}-{}", package_version, described),
    }
}
