// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Run the detection pipeline over a single image file and print the verdict
use parkwatch_node::vision::{
    annotate, classify, encode_jpeg, run_detection, YoloDetector, DEFAULT_MAX_EDGE,
    VEHICLE_CLASS_SET,
};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (model_path, image_path) = match (args.next(), args.next()) {
        (Some(model), Some(image)) => (PathBuf::from(model), PathBuf::from(image)),
        _ => {
            eprintln!("Usage: classify_frame <model.onnx> <image>");
            std::process::exit(2);
        }
    };

    println!("=== Parkwatch: single-frame classification ===\n");

    let detector = YoloDetector::load(&model_path, 0.25, 0.45)?;
    println!("✓ Model loaded from {}", model_path.display());

    let bytes = std::fs::read(&image_path)?;
    let run = run_detection(&detector, &bytes, DEFAULT_MAX_EDGE, 10 * 1024 * 1024)?;
    println!(
        "✓ {} detections in {}ms ({}x{} normalized)",
        run.detections.len(),
        run.inference_time_ms,
        run.image.width(),
        run.image.height()
    );

    for detection in &run.detections {
        let [x1, y1, x2, y2] = detection.bbox;
        println!(
            "  - {} {:.2} at [{:.0}, {:.0}, {:.0}, {:.0}]",
            detection.label(),
            detection.confidence,
            x1,
            y1,
            x2,
            y2
        );
    }

    let annotated = annotate(&run.image, &run.detections);
    let jpeg = encode_jpeg(&annotated)?;
    let out_path = image_path.with_extension("annotated.jpg");
    std::fs::write(&out_path, jpeg)?;
    println!("✓ Annotated image written to {}", out_path.display());

    let result = classify(run.detections, &VEHICLE_CLASS_SET);
    println!(
        "\nVerdict: {} ({} vehicles)",
        result.estado(),
        result.vehicle_count
    );

    Ok(())
}
