#![forbid(unsafe_code)]

//! Test harness and reference fixtures for `colview`.
//!
//! - [`RecordingAnimator`] - captures every transition a view requests
//! - [`ChangeRecorder`] - counts property notifications across a header
//! - [`HeaderFixture`] - a view built from `(header, width)` pairs
//! - [`layout_checksum`] - stable digest of a header snapshot for goldens

pub mod animator;
pub mod fixture;
pub mod golden;
pub mod recorder;

pub use animator::{RecordedTransition, RecordingAnimator};
pub use fixture::HeaderFixture;
pub use golden::{CHECKSUM_PREFIX, layout_checksum, snapshot_json};
pub use recorder::ChangeRecorder;
