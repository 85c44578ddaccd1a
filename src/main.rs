//! Travel Journal - scrapbook-style travel journal builder
//!
//! Build a journal of map and collage pages, fill it with photos and notes,
//! and export it as a JSON document.

mod app;
mod core;
mod ui;

use app::TravelJournalApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Travel Journal...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 640.0])
            .with_title("Travel Journal"),
        ..Default::default()
    };

    eframe::run_native(
        "Travel Journal",
        native_options,
        Box::new(|cc| Ok(Box::new(TravelJournalApp::new(cc)))),
    )
}
