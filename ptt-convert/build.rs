//! Build script for ptt-convert
//!
//! Stamps the binary so a conversion log can be matched to the exact
//! converter that produced a set of interchange documents and snapshot.
//! `main` prints all three values in its startup line:
//! - `GIT_HASH`: short commit of the workspace, or `unknown` outside git
//! - `BUILD_TIMESTAMP`: UTC build time, RFC 3339
//! - `BUILD_PROFILE`: cargo profile (`debug` or `release`)

use std::process::Command;

fn git_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|hash| hash.trim().to_string())
}

fn main() {
    let stamps = [
        ("GIT_HASH", git_hash().unwrap_or_else(|| "unknown".to_string())),
        (
            "BUILD_TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        (
            "BUILD_PROFILE",
            std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string()),
        ),
    ];

    for (name, value) in stamps {
        println!("cargo:rustc-env={}={}", name, value);
    }

    // Without rerun-if-changed cargo reruns this on every build, keeping the
    // timestamp and hash current
}
