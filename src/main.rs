// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use parkwatch_node::{
    api::{start_server, AppState},
    config::Config,
    storage::ArtifactStore,
    vision::{Detector, YoloDetector},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚗 Starting Parkwatch Node...\n");
    println!("📦 BUILD VERSION: {}", parkwatch_node::version::VERSION);
    println!("📅 Build Date: {}", parkwatch_node::version::BUILD_DATE);
    println!();

    let config = Config::parse();
    config.validate()?;

    // Load the detection model once; the handle is shared read-only across
    // all requests
    println!("🧠 Loading detection model: {}", config.model_path.display());
    let detector: Option<Arc<dyn Detector>> =
        match YoloDetector::load(&config.model_path, config.confidence, config.iou) {
            Ok(detector) => {
                println!("✅ Detection model loaded");
                println!("   Confidence threshold: {}", config.confidence);
                println!("   NMS IoU threshold:    {}", config.iou);
                Some(Arc::new(detector))
            }
            Err(e) => {
                eprintln!("⚠️  Failed to load detection model: {}", e);
                eprintln!("   The node will start but inference endpoints will return 503.");
                None
            }
        };

    // Artifact store for persisted /upload results
    let store = ArtifactStore::open(&config.result_dir).await?;

    let addr = config.addr;
    let max_edge = config.max_edge;
    let occupancy_mode = config.occupancy_mode;
    let state = AppState {
        detector,
        store,
        config: Arc::new(config),
    };

    // Print node information
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🅿️  Parkwatch Node is running");
    println!("{}", separator);
    println!("Listen address: {}", addr);
    println!("Max image edge: {} px", max_edge);
    println!("Occupancy mode: {}", occupancy_mode);
    println!("\nAPI Endpoints:");
    println!("  Form:         http://{}/", addr);
    println!("  Health:       http://{}/health", addr);
    println!("  Detect:       POST http://{}/api/detect", addr);
    println!("  Occupancy:    POST http://{}/api/occupancy", addr);
    println!("  Upload:       POST http://{}/upload", addr);
    println!("  Results:      http://{}/results/json", addr);
    println!("\nTest with curl:");
    println!("  curl -X POST http://{}/api/occupancy \\", addr);
    println!("    -F 'image=@parking_lot.jpg'");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(state)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    println!("\n⏹️  Shutting down...");
    println!("👋 Goodbye!");
    Ok(())
}
