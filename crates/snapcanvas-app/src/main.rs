//! Main application entry point.
//!
//! Usage: `snapcanvas [--config FILE] [SCRIPT]`. Without a script the demo
//! session is replayed.

use snapcanvas_app::{DEMO_SCRIPT, Session, print_help};
use snapcanvas_core::CanvasConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting SnapCanvas");

    let mut config_path = None;
    let mut script_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: snapcanvas [--config FILE] [SCRIPT]");
                print_help();
                return ExitCode::SUCCESS;
            }
            "-c" | "--config" => config_path = args.next(),
            _ => script_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => match CanvasConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => CanvasConfig::default(),
    };

    let script = match script_path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(script) => script,
            Err(e) => {
                log::error!("Failed to read script {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => DEMO_SCRIPT.to_string(),
    };

    let mut session = Session::new(config);
    if let Err(e) = session.run_script(&script) {
        log::error!("Session stopped: {}", e);
        return ExitCode::FAILURE;
    }

    let canvas = session.canvas();
    for item in canvas.items() {
        let label = item.source().map(|s| s.label.as_str()).unwrap_or("item");
        println!(
            "{:10} center ({:.1}, {:.1}) size {:.1}x{:.1}",
            label,
            item.position().x,
            item.position().y,
            item.size().width,
            item.size().height
        );
    }
    println!("can undo: {}, can redo: {}", canvas.can_undo(), canvas.can_redo());
    ExitCode::SUCCESS
}
