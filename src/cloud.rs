//! Word-cloud layout and rasterization.
//!
//! Words are placed largest first. Each word's font size is derived from the
//! previous one and its relative frequency, then an Archimedean spiral
//! starting at the canvas centre is walked until the word's bounding box no
//! longer overlaps anything already placed. A word that fits nowhere is
//! retried at smaller sizes; once the size drops below the minimum, layout
//! stops.

use std::f32::consts::TAU;
use std::path::PathBuf;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info, warn};

use crate::error::RenderError;
use crate::font::load_font;
use crate::stopwords::Stopwords;
use crate::words::{CloudWords, FrequencyTable};

/// Radial distance gained per spiral turn, in pixels.
const SPIRAL_SPACING: f32 = 6.0;
/// Arc length between two candidate positions, in pixels.
const SPIRAL_STEP: f32 = 4.0;

/// Viridis samples, darkest first; the two lightest are left out for contrast on white.
const PALETTE: [Rgb<u8>; 8] = [
    Rgb([68, 1, 84]),
    Rgb([72, 40, 120]),
    Rgb([62, 73, 137]),
    Rgb([49, 104, 142]),
    Rgb([38, 130, 142]),
    Rgb([31, 158, 137]),
    Rgb([53, 183, 121]),
    Rgb([110, 206, 88]),
];

/// Renderer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub min_font_size: u32,
    /// Size of the most frequent word; `height / 4` when unset.
    pub max_font_size: Option<u32>,
    pub font_step: u32,
    pub max_words: usize,
    /// 0 sizes by rank only, 1 sizes proportionally to frequency.
    pub relative_scaling: f32,
    /// Free space kept around each word, in pixels.
    pub margin: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            background: Rgb([255, 255, 255]),
            min_font_size: 10,
            max_font_size: None,
            font_step: 2,
            max_words: 200,
            relative_scaling: 0.5,
            margin: 2,
            font_path: None,
        }
    }
}

/// A word with its final position and size. `x`/`y` are the top-left corner of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub count: u32,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgb<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Output of [`WordCloud::render`].
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbImage,
    pub placed: Vec<PlacedWord>,
}

pub struct WordCloud {
    options: CloudOptions,
    stopwords: Stopwords,
    font: FontArc,
}

impl WordCloud {
    /// Loads the configured font; fails when it cannot be read or parsed.
    pub fn new(options: CloudOptions, stopwords: Stopwords) -> Result<Self, RenderError> {
        let font = load_font(options.font_path.as_deref())?;
        Ok(Self {
            options,
            stopwords,
            font,
        })
    }

    /// Word counts the cloud is sized from, most frequent first, capped at `max_words`.
    ///
    /// A flat sequence is counted here with stopwords removed. A frequency
    /// table is taken as it is.
    pub fn counts(&self, words: &CloudWords) -> Vec<(String, u32)> {
        let mut counts = match words {
            CloudWords::Flat(tokens) => FrequencyTable::from_tokens(tokens, &self.stopwords).sorted(),
            CloudWords::Unique(table) => table.sorted(),
        };
        counts.truncate(self.options.max_words);
        counts
    }

    /// Computes positions and sizes for `counts` (sorted, most frequent first).
    pub fn layout(&self, counts: &[(String, u32)]) -> Vec<PlacedWord> {
        let opts = &self.options;
        let Some(max_count) = counts.first().map(|(_, c)| *c as f32) else {
            return Vec::new();
        };

        let mut font_size = opts.max_font_size.unwrap_or(opts.height / 4).max(opts.min_font_size) as f32;
        let mut last_freq = 1.0f32;
        let mut occupied: Vec<Rect> = Vec::new();
        let mut placed = Vec::new();

        for (rank, (word, count)) in counts.iter().enumerate() {
            let freq = *count as f32 / max_count;
            if freq <= 0.0 {
                continue;
            }
            if opts.relative_scaling != 0.0 {
                let rs = opts.relative_scaling;
                font_size = ((rs * (freq / last_freq) + (1.0 - rs)) * font_size).round();
            }

            let mut size = font_size as u32;
            let spot = loop {
                if size < opts.min_font_size {
                    break None;
                }
                let (w, h) = text_size(PxScale::from(size as f32), &self.font, word);
                let boxed = (w + 2 * opts.margin, h + 2 * opts.margin);
                if let Some((x, y)) = self.find_position(boxed.0, boxed.1, &occupied) {
                    occupied.push(Rect {
                        x,
                        y,
                        w: boxed.0,
                        h: boxed.1,
                    });
                    break Some((x + opts.margin, y + opts.margin, w, h));
                }
                debug!("no room for \"{}\" at {}px", word, size);
                match size.checked_sub(opts.font_step.max(1)) {
                    Some(smaller) => size = smaller,
                    None => break None,
                }
            };

            let Some((x, y, width, height)) = spot else {
                warn!(
                    "canvas full: placed {} of {} words, stopped at \"{}\"",
                    placed.len(),
                    counts.len(),
                    word
                );
                break;
            };

            font_size = size as f32;
            last_freq = freq;
            placed.push(PlacedWord {
                word: word.clone(),
                count: *count,
                font_size: size,
                x,
                y,
                width,
                height,
                color: PALETTE[rank % PALETTE.len()],
            });
        }
        placed
    }

    /// Lays out and draws `words`. Fails when nothing is left after stopword filtering.
    pub fn render(&self, words: &CloudWords) -> Result<Rendered, RenderError> {
        let counts = self.counts(words);
        if counts.is_empty() {
            return Err(RenderError::NothingToDraw);
        }

        let placed = self.layout(&counts);
        if placed.is_empty() {
            warn!("no word fits on a {}x{} canvas", self.options.width, self.options.height);
        }

        let mut image = RgbImage::from_pixel(self.options.width, self.options.height, self.options.background);
        for p in &placed {
            draw_text_mut(
                &mut image,
                p.color,
                p.x as i32,
                p.y as i32,
                PxScale::from(p.font_size as f32),
                &self.font,
                &p.word,
            );
        }
        info!("placed {} of {} words", placed.len(), counts.len());
        Ok(Rendered { image, placed })
    }

    /// Walks a spiral out from the centre and returns the first top-left
    /// corner where a `w`x`h` box fits inside the canvas without overlap.
    fn find_position(&self, w: u32, h: u32, occupied: &[Rect]) -> Option<(u32, u32)> {
        let (canvas_w, canvas_h) = (self.options.width, self.options.height);
        if w > canvas_w || h > canvas_h {
            return None;
        }

        let (cw, ch) = (canvas_w as f32, canvas_h as f32);
        let max_radius = cw.hypot(ch) / 2.0;
        let mut theta = 0.0f32;
        loop {
            let r = SPIRAL_SPACING * theta / TAU;
            if r > max_radius {
                return None;
            }
            let x = (cw / 2.0 + r * theta.cos() - w as f32 / 2.0).round();
            let y = (ch / 2.0 + r * theta.sin() - h as f32 / 2.0).round();
            if x >= 0.0 && y >= 0.0 && x + w as f32 <= cw && y + h as f32 <= ch {
                let candidate = Rect {
                    x: x as u32,
                    y: y as u32,
                    w,
                    h,
                };
                if !occupied.iter().any(|o| o.intersects(&candidate)) {
                    return Some((candidate.x, candidate.y));
                }
            }
            theta += (SPIRAL_STEP / r.max(SPIRAL_STEP)).min(0.5);
        }
    }
}
