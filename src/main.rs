//! # Folio CLI
//!
//! Usage:
//!   folio template.json -o layout.json
//!   echo '{ ... }' | folio
//!   folio --example > report.json
//!
//! Set `RUST_LOG=debug` to watch page and split decisions.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_report_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("✗ Failed to read template: {}", e);
            process::exit(1);
        }
    };

    // Parse output path; stdout when absent
    let output_path = args.windows(2).find(|w| w[0] == "-o").map(|w| w[1].clone());

    let info = match folio::paginate_json(&input) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    };

    for warning in &info.warnings {
        eprintln!("! {}", warning);
    }

    let json = match serde_json::to_string_pretty(&info) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("✗ Failed to serialize layout: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("✗ Failed to write {}: {}", path, e);
                process::exit(1);
            }
            eprintln!("✓ Written {} page(s) to {}", info.pages.len(), path);
        }
        None => println!("{}", json),
    }
}

fn example_report_json() -> &'static str {
    r##"{
  "page": {
    "size": { "Custom": { "width": 595.28, "height": 500 } },
    "margin": { "top": 0, "right": 36, "bottom": 0, "left": 36 }
  },
  "pageHeader": {
    "kind": { "type": "Band" },
    "id": "page-header",
    "height": 30,
    "markup": "Quarterly Sales"
  },
  "pageFooter": {
    "kind": { "type": "Band" },
    "id": "page-footer",
    "height": 50,
    "markup": "Page {page} of {pages}"
  },
  "children": [
    { "kind": { "type": "Band" }, "id": "report-title", "height": 60 },
    {
      "kind": { "type": "Container" },
      "id": "region-north",
      "insets": { "top": 4, "bottom": 4 },
      "children": [
        { "kind": { "type": "Band" }, "id": "north-header", "height": 24, "repeat": true },
        { "kind": { "type": "Band" }, "id": "north-row-1", "height": 80 },
        { "kind": { "type": "Band" }, "id": "north-row-2", "height": 80 },
        { "kind": { "type": "Band" }, "id": "north-row-3", "height": 80 },
        { "kind": { "type": "Band" }, "id": "north-row-4", "height": 80 },
        { "kind": { "type": "Band" }, "id": "north-total", "height": 30 }
      ]
    },
    { "kind": { "type": "PageBreak" } },
    {
      "kind": { "type": "Container" },
      "id": "region-south",
      "children": [
        { "kind": { "type": "Band" }, "id": "south-header", "height": 24, "repeat": true },
        { "kind": { "type": "Band" }, "id": "south-row-1", "height": 80 },
        { "kind": { "type": "Band" }, "id": "south-total", "height": 30 }
      ]
    },
    { "kind": { "type": "Band" }, "id": "report-summary", "height": 120 }
  ]
}"##
}
