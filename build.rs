//! Embeds a version string for `dotman version`.
use std::process::Command;

fn main() {
    // Prefer DOTMAN_VERSION if set (release builds), otherwise git describe.
    if let Ok(version) = std::env::var("DOTMAN_VERSION") {
        println!("cargo:rustc-env=DOTMAN_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=DOTMAN_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DOTMAN_VERSION");
}
