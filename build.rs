//! Build script that embeds version information.

use std::process::Command;

fn main() {
    // A release pipeline may pin the version; otherwise ask git.
    if let Ok(version) = std::env::var("CONFIG_PROFILE_VERSION") {
        println!("cargo:rustc-env=CONFIG_PROFILE_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=CONFIG_PROFILE_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=CONFIG_PROFILE_VERSION");
}
