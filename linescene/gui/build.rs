use std::process::Command;

fn main() {
    let git_hash = match Command::new("git").args(["rev-parse", "--short", "HEAD"]).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => "unknown".to_string(),
    };

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    let date_time = chrono::Utc::now();
    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        date_time.format("%Y-%m-%d %H:%M:%S")
    );

    let rustc_version = Command::new("rustc")
        .args(["--version"])
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=RUSTC_VERSION={}", rustc_version);
}
