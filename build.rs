//! Build script: embeds a version string as `PROFILE_STORE_VERSION`.

use std::process::Command;

fn main() {
    // Prefer PROFILE_STORE_VERSION if set (e.g. by a release workflow),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("PROFILE_STORE_VERSION") {
        println!("cargo:rustc-env=PROFILE_STORE_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=PROFILE_STORE_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=PROFILE_STORE_VERSION");
}
