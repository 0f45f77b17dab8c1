#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use linescene_shared::config::SceneConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Coordinate axes and a grid, drawn with OpenGL")]
struct Args {
    /// Scene configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    use color_eyre::Report;

    color_eyre::install()?;
    if !cfg!(debug_assertions) {
        linescene_gui::panic_dialog::setup();
    }

    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(config.window.width, config.window.height)),
        depth_buffer: 24,
        multisampling: 4,
        ..Default::default()
    };

    let res = eframe::run_native(
        "linescene",
        native_options,
        Box::new(move |cc| Box::new(linescene_gui::LinesceneApp::new(cc, config))),
    );

    match res {
        Ok(()) => Ok(()),
        Err(e) => Err(Report::msg(e.to_string())),
    }
}
