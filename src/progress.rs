//! Progress-callback trait for per-row bulk generation events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to receive
//! events as a bulk run works through its rows. The CLI uses this to drive a
//! terminal progress bar; a service could forward the same events to a
//! channel or a job record.
//!
//! # Example
//!
//! ```rust
//! use adcopy::{BatchProgressCallback, GenerationConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_row_complete(&self, row_num: usize, total_rows: usize, ad_group: &str) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Row {}/{} done ({})", row_num, total_rows, ad_group);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the bulk pipeline as it processes each row.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Rows are processed one at a time, but the trait is
/// `Send + Sync` so a callback can be shared with a spawned task.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first row.
    ///
    /// # Arguments
    /// * `total_rows`: rows that will be attempted (rows without a URL excluded)
    fn on_batch_start(&self, total_rows: usize) {
        let _ = total_rows;
    }

    /// Called just before a row's landing page is fetched.
    fn on_row_start(&self, row_num: usize, total_rows: usize) {
        let _ = (row_num, total_rows);
    }

    /// Called when a row produced a full asset set.
    fn on_row_complete(&self, row_num: usize, total_rows: usize, ad_group: &str) {
        let _ = (row_num, total_rows, ad_group);
    }

    /// Called when a row failed; the batch continues.
    ///
    /// # Arguments
    /// * `error`: human-readable error description
    fn on_row_error(&self, row_num: usize, total_rows: usize, error: &str) {
        let _ = (row_num, total_rows, error);
    }

    /// Called once after every row has been attempted.
    fn on_batch_complete(&self, total_rows: usize, success_count: usize) {
        let _ = (total_rows, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
