// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inline HTML pages for the browser flow
//!
//! The browser flow is deliberately dependency-free: two small pages built
//! with string formatting, the annotated image carried inline as a base64
//! data URI so no second request is needed.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::vision::OccupancyResult;

/// Landing page with the upload form
pub fn upload_form() -> String {
    page_with_result("")
}

/// Result page embedding the annotated image and a detection dump
pub fn detection_page(annotated_jpeg: &[u8], result: &OccupancyResult) -> String {
    let image_data = STANDARD.encode(annotated_jpeg);

    let mut items = String::new();
    for detection in &result.detections {
        let [x1, y1, x2, y2] = detection.bbox;
        items.push_str(&format!(
            "            <li>{} ({:.2}) at [{:.0}, {:.0}, {:.0}, {:.0}]</li>\n",
            detection.label(),
            detection.confidence,
            x1,
            y1,
            x2,
            y2
        ));
    }
    if items.is_empty() {
        items.push_str("            <li>No objects detected</li>\n");
    }

    let section = format!(
        r#"        <h2>Result: {estado} ({count} vehicles)</h2>
        <img src="data:image/jpeg;base64,{image_data}" alt="Annotated detection result">
        <ul>
{items}        </ul>
"#,
        estado = result.estado(),
        count = result.vehicle_count,
        image_data = image_data,
        items = items,
    );

    page_with_result(&section)
}

fn page_with_result(result_section: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Parkwatch Detection</title>
</head>
<body>
    <h1>Parkwatch vehicle detection</h1>
    <form action="/detect" method="post" enctype="multipart/form-data">
        <input type="file" name="image" accept="image/*" required>
        <button type="submit">Detect</button>
    </form>
{result_section}</body>
</html>
"#,
        result_section = result_section,
    )
}
