//! Main application entry point (native).

use inkmark_app::{App, AppConfig, AppError};

fn main() -> Result<(), AppError> {
    env_logger::init();
    log::info!("Starting InkMark");

    let config = AppConfig::from_args(std::env::args().skip(1))?;
    let (app, scene) = App::run(&config)?;

    for command in scene.commands() {
        log::debug!("{command:?}");
    }
    let report = app.report(&scene);
    println!(
        "{} elements, {} strokes, {} text runs, {} snapshots (undo: {}, redo: {})",
        report.elements,
        report.strokes,
        report.texts,
        report.snapshots,
        report.can_undo,
        report.can_redo
    );
    Ok(())
}
