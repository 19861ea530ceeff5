//! # label-decode CLI
//!
//! Command-line interface for the label decode pipeline.
//!
//! ## Usage
//! ```bash
//! label-decode decode photo.jpg
//! label-decode decode photo.jpg --output json
//! label-decode ocr photo.jpg
//! ```

mod cli;

use label_decode::Result;

#[tokio::main]
async fn main() -> Result<()> {
    label_decode::init_tracing();
    cli::run().await
}
