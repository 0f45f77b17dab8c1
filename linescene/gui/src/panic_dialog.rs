use std::{
    backtrace::{Backtrace, BacktraceStatus},
    fmt::Write as _,
};

use crate::strip_ansi_codes;

const PANIC_LOG: &str = "panic.log";

/// Replaces the panic hook: the color-eyre report goes to stderr, a crash report to
/// `panic.log`, and release builds show a dialog and exit.
pub fn setup() {
    std::panic::set_hook(Box::new(|info| {
        let (panic_hook, _) = color_eyre::config::HookBuilder::new().into_hooks();
        eprintln!("{}", panic_hook.panic_report(info));

        let message = strip_ansi_codes(&info.to_string());
        if let Err(e) = std::fs::write(PANIC_LOG, crash_report(&message, &Backtrace::capture())) {
            eprintln!("Failed to write {PANIC_LOG}: {e}");
        }

        if cfg!(debug_assertions) {
            return;
        }

        show_crash_dialog(&message);
        std::process::exit(-1);
    }))
}

fn show_crash_dialog(message: &str) {
    let result = native_dialog::MessageDialog::new()
        .set_type(native_dialog::MessageType::Error)
        .set_title("linescene crashed")
        .set_text(&format!("{message}\n\nA crash report was saved to {PANIC_LOG}"))
        .show_alert();

    if let Err(e) = result {
        eprintln!("Failed to show crash dialog: {e}");
    }
}

/// Text written to the panic log: build info, the panic message, then the backtrace
/// when one was captured.
fn crash_report(message: &str, bt: &Backtrace) -> String {
    let mut report = String::new();

    // Writing into a String can't fail
    let _ = writeln!(
        report,
        "linescene {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_DATE")
    );
    let _ = writeln!(report, "{}", env!("RUSTC_VERSION"));
    let _ = writeln!(report);
    let _ = writeln!(report, "{message}");

    if bt.status() == BacktraceStatus::Captured {
        let _ = writeln!(report);
        let _ = writeln!(report, "Backtrace:");
        let _ = writeln!(report, "{bt}");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crash_report_starts_with_build_info() {
        let report = crash_report(
            "panicked at 'boom', src/app.rs:1:1",
            &Backtrace::disabled(),
        );
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines[0].starts_with("linescene "));
        assert!(lines[0].contains(env!("GIT_HASH")));
        assert_eq!(lines[1], env!("RUSTC_VERSION"));
        assert_eq!(lines[3], "panicked at 'boom', src/app.rs:1:1");
        assert!(!report.contains("Backtrace:"));
    }
}
