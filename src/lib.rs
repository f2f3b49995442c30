//! # review_cloud
//!
//! Turns a Play Store review export into a word-cloud image.
//!
//! The pipeline is linear: [`load_reviews`] reads and filters the export,
//! [`extract_words_from_reviews`] cleans the review text into tokens,
//! [`aggregate`] either keeps the raw sequence or folds it into a
//! [`FrequencyTable`], and [`WordCloud`] lays out and draws the result.
//! [`run`] strings the stages together the way the CLI does.
//!
//! ```no_run
//! use review_cloud::{Aggregation, CloudRequest, run};
//!
//! let mut request = CloudRequest::new("reviews_reviews_com.example_202005.csv");
//! request.language = Some("en".to_string());
//! request.aggregation = Aggregation::Unique;
//! request.output = Some("cloud.png".into());
//! let report = run(&request, &mut std::io::stdout()).unwrap();
//! println!("{} words placed", report.placed_words);
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use image::RgbImage;
use log::info;

pub mod cloud;
pub mod error;
pub mod font;
pub mod output;
pub mod report;
pub mod stopwords;
pub mod words;

pub use cloud::{CloudOptions, PlacedWord, Rendered, WordCloud};
pub use error::{CloudError, EmptyInputError, LoadError, RenderError};
pub use output::{display_image, save_image};
pub use report::{InputEncoding, ReviewRecord, load_reviews};
pub use stopwords::Stopwords;
pub use words::{
    Aggregation, CloudWords, FrequencyTable, aggregate, clean_word, extract_words,
    extract_words_from_reviews, join_tokens,
};

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudRequest {
    pub report_path: PathBuf,
    /// Keep only reviews whose `Reviewer Language` equals this code.
    pub language: Option<String>,
    /// Save here; display in the terminal when `None`.
    pub output: Option<PathBuf>,
    pub aggregation: Aggregation,
    /// Extra stopwords, one per line, on top of the built-in English list.
    pub stopwords_file: Option<PathBuf>,
    pub encoding: InputEncoding,
    pub cloud: CloudOptions,
}

impl CloudRequest {
    pub fn new<P: Into<PathBuf>>(report_path: P) -> Self {
        Self {
            report_path: report_path.into(),
            language: None,
            output: None,
            aggregation: Aggregation::default(),
            stopwords_file: None,
            encoding: InputEncoding::default(),
            cloud: CloudOptions::default(),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudReport {
    /// Reviews that passed the language and text filters.
    pub reviews: usize,
    /// Tokens extracted from those reviews.
    pub tokens: usize,
    /// Distinct words handed to the renderer.
    pub distinct_words: usize,
    /// Words that made it onto the canvas.
    pub placed_words: usize,
    /// Where the image was saved, `None` when it was displayed.
    pub output: Option<PathBuf>,
}

///Builds the stopword set: the built-in English list plus an optional file.
pub fn build_stopwords(file: Option<&Path>) -> Result<Stopwords, CloudError> {
    let stopwords = Stopwords::english();
    match file {
        Some(path) => stopwords
            .with_file(path)
            .map_err(|source| CloudError::Stopwords {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(stopwords),
    }
}

/// Runs load, tokenize and aggregate; returns the renderer input.
///
/// Fails with [`EmptyInputError`] when no review qualifies or no token
/// survives cleaning, before any rendering is attempted.
pub fn prepare(
    request: &CloudRequest,
    stopwords: &Stopwords,
) -> Result<(CloudWords, CloudReport), CloudError> {
    let reviews = load_reviews(
        &request.report_path,
        request.language.as_deref(),
        request.encoding,
    )?;
    if reviews.is_empty() {
        return Err(EmptyInputError::NoQualifyingReviews {
            language: request.language.clone(),
        }
        .into());
    }

    let tokens = extract_words_from_reviews(&reviews);
    info!("extracted {} words from {} reviews", tokens.len(), reviews.len());
    let token_count = tokens.len();

    let words = aggregate(tokens, request.aggregation, stopwords).map_err(|err| match err {
        EmptyInputError::NoTokens { .. } => EmptyInputError::NoTokens {
            reviews: reviews.len(),
        },
        other => other,
    })?;

    let report = CloudReport {
        reviews: reviews.len(),
        tokens: token_count,
        distinct_words: words.distinct(),
        placed_words: 0,
        output: None,
    };
    Ok((words, report))
}

/// Produces the word-cloud image for `request` without writing it anywhere.
pub fn generate(request: &CloudRequest) -> Result<(RgbImage, CloudReport), CloudError> {
    let stopwords = build_stopwords(request.stopwords_file.as_deref())?;
    let (words, mut report) = prepare(request, &stopwords)?;

    let cloud = WordCloud::new(request.cloud.clone(), stopwords)?;
    let rendered = cloud.render(&words)?;
    report.placed_words = rendered.placed.len();
    Ok((rendered.image, report))
}

/// Generates the cloud, then saves it to `request.output` or, when no output
/// path is set, displays it by writing terminal graphics sequences to `terminal`.
pub fn run<W: Write>(request: &CloudRequest, terminal: &mut W) -> Result<CloudReport, CloudError> {
    let (image, mut report) = generate(request)?;
    match &request.output {
        Some(path) => {
            save_image(&image, path)?;
            report.output = Some(path.clone());
        }
        None => display_image(&image, terminal)?,
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_utf16(path: &Path, text: &str) {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        fs::write(path, bytes).unwrap();
    }

    const REPORT: &str = "Package Name,Reviewer Language,Review Text\n\
        com.example,en,Great app! 😀😀\n\
        com.example,es,Me gusta mucho\n\
        com.example,en,\"Not great, too many ads.\"\n";

    #[test]
    fn prepare_flat_keeps_every_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, REPORT);

        let mut request = CloudRequest::new(&path);
        request.language = Some("en".to_string());
        let (words, report) = prepare(&request, &Stopwords::english()).unwrap();

        let expected: Vec<String> = ["great", "app", "not", "great", "too", "many", "ads"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(words, CloudWords::Flat(expected));
        assert_eq!(report.reviews, 2);
        assert_eq!(report.tokens, 7);
        assert_eq!(report.distinct_words, 6);
    }

    #[test]
    fn prepare_unique_counts_without_stopwords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, REPORT);

        let mut request = CloudRequest::new(&path);
        request.language = Some("en".to_string());
        request.aggregation = Aggregation::Unique;
        let (words, _) = prepare(&request, &Stopwords::english()).unwrap();

        let CloudWords::Unique(table) = words else {
            panic!("expected a frequency table");
        };
        assert_eq!(table.get("great"), Some(2));
        assert_eq!(table.get("app"), Some(1));
        assert_eq!(table.get("not"), None);
        assert_eq!(table.get("me"), None);
    }

    #[test]
    fn no_matching_language_fails_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, REPORT);

        let mut request = CloudRequest::new(&path);
        request.language = Some("fr".to_string());
        // an unreadable font would fail rendering; the empty input must win
        request.cloud.font_path = Some(PathBuf::from("/nonexistent/font.ttf"));

        match generate(&request) {
            Err(CloudError::EmptyInput(EmptyInputError::NoQualifyingReviews { language })) => {
                assert_eq!(language.as_deref(), Some("fr"))
            }
            other => panic!("expected empty input, got {other:?}"),
        }
    }

    #[test]
    fn reviews_cleaned_to_nothing_report_their_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, "Reviewer Language,Review Text\nen,😀😀 !!\nen,a b c\n");

        let err = prepare(&CloudRequest::new(&path), &Stopwords::english()).unwrap_err();
        assert!(matches!(
            err,
            CloudError::EmptyInput(EmptyInputError::NoTokens { reviews: 2 })
        ));
    }

    #[test]
    fn missing_stopword_file_is_reported() {
        let err = build_stopwords(Some(Path::new("/nonexistent/stop.txt"))).unwrap_err();
        assert!(matches!(err, CloudError::Stopwords { .. }));
    }

    #[test]
    fn run_saves_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, REPORT);
        let out = dir.path().join("cloud.png");

        let mut request = CloudRequest::new(&path);
        request.output = Some(out.clone());
        let mut terminal = Vec::new();
        let report = run(&request, &mut terminal).unwrap();

        assert!(terminal.is_empty());
        assert_eq!(report.output.as_deref(), Some(out.as_path()));
        assert!(report.placed_words > 0);
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (800, 800));
    }

    #[test]
    fn run_without_output_displays_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        write_utf16(&path, REPORT);

        let mut terminal = Vec::new();
        let report = run(&CloudRequest::new(&path), &mut terminal).unwrap();

        assert!(report.output.is_none());
        assert!(terminal.starts_with(b"\x1b_Ga=T,f=100,"));
    }
}
