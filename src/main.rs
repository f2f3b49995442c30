#![forbid(unsafe_code)]
//! # Review Cloud CLI
//!
//! Command-line interface for the `review_cloud` crate. Reads a Play Store
//! review export (.csv) and renders a word cloud of the review text.
//!
//! ## Features
//! - Optional filter on the reviewer's language.
//! - Flat mode (every word occurrence) or unique mode (counted, stopwords removed).
//! - Save to PNG/JPEG, or show the cloud inline in a Kitty-compatible terminal.
//!
//! ## Example
//! ```bash
//! cargo run --release -- -r reviews_reviews_com.example_202005.csv -l en -o cloud.png --unique
//! ```
//!
//! See `--help` for all available options.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;
use review_cloud::{Aggregation, CloudOptions, CloudRequest, InputEncoding, run};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Review export (.csv) to read
    #[arg(short = 'r', long, value_name = "FILE")]
    report_path: PathBuf,

    /// Only use reviews in this language (e.g. en, es)
    #[arg(short, long, value_name = "CODE")]
    language: Option<String>,

    /// Save the image here (.png, .jpg); shown in the terminal if omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Count identical words and drop stopwords before rendering (default: false)
    #[arg(short, long, default_value_t = false)]
    unique: bool,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long, value_name = "FILE")]
    stopwords: Option<PathBuf>,

    /// TrueType/OpenType font to draw with (default: bundled DejaVu Sans)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Text encoding of the report
    #[arg(long, value_enum, default_value = "utf16")]
    encoding: InputEncoding,
}

impl Cli {
    fn into_request(self) -> CloudRequest {
        CloudRequest {
            report_path: self.report_path,
            language: self.language,
            output: self.output,
            aggregation: if self.unique {
                Aggregation::Unique
            } else {
                Aggregation::Flat
            },
            stopwords_file: self.stopwords,
            encoding: self.encoding,
            cloud: CloudOptions {
                font_path: self.font,
                ..CloudOptions::default()
            },
        }
    }
}

fn main() {
    env_logger::init();
    let request = Cli::parse().into_request();

    let result = {
        let mut stdout = io::stdout().lock();
        run(&request, &mut stdout)
    };

    match result {
        Ok(report) => {
            if let Some(path) = &report.output {
                println!(
                    "Saved word cloud to {} ({} words from {} reviews)",
                    path.display(),
                    report.placed_words,
                    report.reviews
                );
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
