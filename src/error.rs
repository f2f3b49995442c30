//! Error types for every stage of the pipeline.
//!
//! Each stage has its own enum so the message printed by the CLI names the
//! stage that failed. [`CloudError`] wraps them for the top-level entry points.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading the review export.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("report {} is not valid {encoding}: {reason}", .path.display())]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
        reason: String,
    },

    #[error("report {} has no \"{column}\" column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("malformed row in report {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Nothing survived loading or cleaning, so there is nothing to plot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmptyInputError {
    #[error("{}", no_reviews_message(.language.as_deref()))]
    NoQualifyingReviews { language: Option<String> },

    #[error("no words left after cleaning {reviews} review(s)")]
    NoTokens { reviews: usize },
}

fn no_reviews_message(language: Option<&str>) -> String {
    match language {
        Some(lang) => format!("no reviews with text found for language \"{lang}\""),
        None => "no reviews with text found in report".to_string(),
    }
}

/// Failure while laying out, encoding, or emitting the image.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot load font: {0}")]
    Font(String),

    #[error("no words left to draw after stopword filtering")]
    NothingToDraw,

    #[error("unsupported image format for {} (use .png, .jpg or .jpeg)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("cannot write image to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot display image in terminal: {0}")]
    Display(#[source] io::Error),
}

/// Top-level error returned by [`crate::generate`] and [`crate::run`].
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("loading failed: {0}")]
    Load(#[from] LoadError),

    #[error("nothing to plot: {0}")]
    EmptyInput(#[from] EmptyInputError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("cannot read stopword file {}: {source}", .path.display())]
    Stopwords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_message_names_column() {
        let err = LoadError::MissingColumn {
            path: PathBuf::from("reviews.csv"),
            column: "Review Text",
        };
        let msg = CloudError::from(err).to_string();
        assert!(msg.starts_with("loading failed"));
        assert!(msg.contains("\"Review Text\""));
        assert!(msg.contains("reviews.csv"));
    }

    #[test]
    fn empty_input_message_mentions_language() {
        let err = EmptyInputError::NoQualifyingReviews {
            language: Some("es".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "no reviews with text found for language \"es\""
        );

        let err = EmptyInputError::NoQualifyingReviews { language: None };
        assert_eq!(err.to_string(), "no reviews with text found in report");
    }
}
