//! patmatch locates occurrences of a learned grayscale pattern inside a
//! larger image, tolerant to in-plane rotation, and returns ranked matches
//! with sub-pixel centers.
//!
//! The pipeline is a coarse-to-fine pyramid search over a discrete angle
//! sweep, scored with masked ZNCC. Scoring has scalar and SIMD (`wide`)
//! paths selected at runtime; the optional `rayon` feature parallelizes the
//! coarse rotation scan. The crate operates purely on in-memory pixel
//! buffers; image decoding and result drawing are the caller's concern.
//!
//! ```
//! use patmatch::{ImageView, MatchConfig, Matcher};
//!
//! let mut template = vec![0u8; 16 * 16];
//! for (i, px) in template.iter_mut().enumerate() {
//!     *px = ((i * 37) % 251) as u8;
//! }
//! let mut source = vec![0u8; 64 * 64];
//! for y in 0..16 {
//!     source[(y + 10) * 64 + 20..(y + 10) * 64 + 36]
//!         .copy_from_slice(&template[y * 16..(y + 1) * 16]);
//! }
//!
//! let mut matcher = Matcher::new();
//! matcher.learn(ImageView::from_slice(&template, 16, 16)?)?;
//! let result = matcher.match_image(
//!     ImageView::from_slice(&source, 64, 64)?,
//!     &MatchConfig::default(),
//! )?;
//! assert!(result.success);
//! # Ok::<(), patmatch::PatMatchError>(())
//! ```

pub mod candidate;
pub mod image;
mod kernel;
mod matcher;
pub mod pattern;
pub mod pose;
mod refine;
mod search;
pub(crate) mod trace;
pub mod util;

pub use candidate::Candidate;
pub use image::pyramid::ImagePyramid;
pub use image::{ImageView, OwnedImage};
pub use matcher::{Match, MatchConfig, MatchResult, Matcher, Point};
pub use pattern::{Pattern, RotatedPlan};
pub use pose::AngleSweep;
pub use util::{PatMatchError, PatMatchResult};
