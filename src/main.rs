mod app_state;
mod canvas;
mod config;
mod element_view;
mod form;
mod header;
mod palette;
mod preview;
mod properties_panel;
mod renderer;
mod states;
mod storage;
mod ui;

use anyhow::Result;
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_state::AppState;
use crate::config::EditorConfig;
use crate::storage::{DirStorage, FormStorage, MemoryStorage};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("formcraft_ui=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Formcraft v{}", env!("CARGO_PKG_VERSION"));

    let config = EditorConfig::load_or_default(&EditorConfig::default_path());
    let storage: Box<dyn FormStorage> = match DirStorage::open(config.storage_dir.clone()) {
        Ok(dir) => {
            info!(dir = %dir.root().display(), "saving forms to disk");
            Box::new(dir)
        }
        Err(err) => {
            warn!(
                dir = %config.storage_dir.display(),
                error = %err,
                "cannot use storage directory; forms will not outlive this session"
            );
            Box::new(MemoryStorage::new())
        }
    };
    let state = AppState::new(config, storage);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Formcraft")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Formcraft",
        native_options,
        Box::new(|_cc| Box::new(ui::create_app(state))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the editor: {}", e))?;
    Ok(())
}
