//! Search that keeps up with the user.
//!
//! Options may change on every keystroke while a pass over a large catalog is
//! still running. The [`SearchEngine`] keeps a single worker task and only
//! ever cares about the newest options and catalog:
//!
//! ```text
//! submit(options) ──┐                       ┌─> results (watch)
//!                   ├─> worker: filter in ──┤
//! set_catalog(..) ──┘   chunks, give up     └─ superseded passes are dropped
//!                       when newer input shows
//! ```
//!
//! Nothing is cancelled explicitly: a newer value simply replaces the pending
//! one in its `watch` channel, and the worker notices it between chunks.
//!
//! Displaying the results is left to a [`ResultWindow`], which only exposes a
//! growing prefix of them and never runs the filter again.

use std::ops::Range;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::models::{Catalog, CatalogEntry};
use crate::filter::{Matcher, SearchOptions};

/// Entries filtered between two checks for newer input
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Outcome of one complete filter pass
#[derive(Clone, Debug, Default)]
pub struct SearchResults {
    /// Number of passes completed so far, 0 before the first one
    pub generation: u64,
    /// Options the results were computed for
    pub options: SearchOptions,
    /// Size of the catalog the results were computed on
    pub catalog_len: usize,
    /// Number of catalog replacements before the pass, 0 for the initial catalog
    pub catalog_generation: u64,
    pub courses: Arc<[Arc<CatalogEntry>]>,
}

/// A catalog and how many times it was replaced
#[derive(Clone, Debug)]
struct CatalogSnapshot {
    generation: u64,
    entries: Catalog,
}

/// Background, latest-wins search over the catalog
pub struct SearchEngine {
    options: watch::Sender<SearchOptions>,
    catalog: watch::Sender<CatalogSnapshot>,
    results: watch::Receiver<SearchResults>,
    worker: JoinHandle<()>,
}

impl SearchEngine {
    /// Start the worker on the current tokio runtime
    #[must_use]
    pub fn spawn(catalog: Catalog, options: SearchOptions, chunk_size: usize) -> Self {
        let (options_tx, options_rx) = watch::channel(options);
        let (catalog_tx, catalog_rx) = watch::channel(CatalogSnapshot {
            generation: 0,
            entries: catalog,
        });
        let (results_tx, results_rx) = watch::channel(SearchResults::default());

        let worker = tokio::spawn(run(options_rx, catalog_rx, results_tx, chunk_size.max(1)));

        Self {
            options: options_tx,
            catalog: catalog_tx,
            results: results_rx,
            worker,
        }
    }

    /// Ask for a search with new options, any pending one is superseded
    pub fn submit(&self, options: SearchOptions) {
        self.options.send_replace(options);
    }

    /// Change a single option field in place
    pub fn modify(&self, f: impl FnOnce(&mut SearchOptions)) {
        self.options.send_modify(f);
    }

    /// Replace the catalog, i.e. once it has been fetched
    pub fn set_catalog(&self, catalog: Catalog) {
        self.catalog.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.entries = catalog;
        });
    }

    /// Number of catalog replacements so far
    #[must_use]
    pub fn catalog_generation(&self) -> u64 {
        self.catalog.borrow().generation
    }

    /// Last published results
    #[must_use]
    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Receiver notified on every published result
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }

    /// Wait until results computed for `options` on the current catalog are published
    pub async fn wait_for(&self, options: &SearchOptions) -> Option<SearchResults> {
        let mut results = self.results.clone();
        let found = results
            .wait_for(|published| {
                published.generation > 0
                    && published.options == *options
                    && published.catalog_generation == self.catalog_generation()
            })
            .await
            .ok()?;
        Some(found.clone())
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    mut options: watch::Receiver<SearchOptions>,
    mut catalog: watch::Receiver<CatalogSnapshot>,
    results: watch::Sender<SearchResults>,
    chunk_size: usize,
) {
    let mut generation = 0;

    loop {
        let wanted = options.borrow_and_update().clone();
        let snapshot = catalog.borrow_and_update().clone();
        let entries = snapshot.entries;

        match filter_in_chunks(&entries, &wanted, chunk_size, &options, &catalog).await {
            Some(courses) => {
                generation += 1;
                tracing::debug!(generation, found = courses.len(), "search results published");
                results.send_replace(SearchResults {
                    generation,
                    options: wanted,
                    catalog_len: entries.len(),
                    catalog_generation: snapshot.generation,
                    courses: courses.into(),
                });
            }
            None => {
                tracing::trace!("search superseded by newer input");
                continue;
            }
        }

        // Sleep until the options or the catalog change
        tokio::select! {
            changed = options.changed() => if changed.is_err() { break },
            changed = catalog.changed() => if changed.is_err() { break },
        }
    }

    tracing::debug!("search worker stopped");
}

/// Filter the catalog, `None` if newer options or catalog show up meanwhile
async fn filter_in_chunks(
    entries: &[Arc<CatalogEntry>],
    wanted: &SearchOptions,
    chunk_size: usize,
    options: &watch::Receiver<SearchOptions>,
    catalog: &watch::Receiver<CatalogSnapshot>,
) -> Option<Vec<Arc<CatalogEntry>>> {
    let matcher = Matcher::new(wanted);
    let mut found = Vec::new();

    for chunk in entries.chunks(chunk_size) {
        found.extend(chunk.iter().filter(|entry| matcher.matches(entry)).cloned());

        // Let the input side run, then check whether this pass still matters
        tokio::task::yield_now().await;
        if superseded(options) || superseded(catalog) {
            return None;
        }
    }

    Some(found)
}

fn superseded<T>(receiver: &watch::Receiver<T>) -> bool {
    // A closed channel means nobody waits for the results anymore
    receiver.has_changed().unwrap_or(true)
}

/// Growing prefix of the results that is actually shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultWindow {
    page_size: usize,
    visible: usize,
}

impl ResultWindow {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            visible: page_size,
        }
    }

    /// Number of rows shown at most
    #[must_use]
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Rows to show out of the results
    #[must_use]
    pub fn window<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        &results[..self.visible.min(results.len())]
    }

    /// Show one more page, returns false when everything is already shown
    pub fn load_more(&mut self, total: usize) -> bool {
        if self.visible >= total {
            return false;
        }

        self.visible = (self.visible + self.page_size).min(total);
        true
    }

    /// Back to the first page, for new options
    pub fn reset(&mut self) {
        self.visible = self.page_size;
    }
}

/// True when the bottom of the viewport is within `threshold` pixels of the end
#[must_use]
pub fn near_end(scroll_offset: f64, viewport: f64, content: f64, threshold: f64) -> bool {
    scroll_offset + viewport + threshold >= content
}

/// Rows to materialize for a scrolled list of `count` rows of `row_height`
///
/// `overscan` extra rows are kept on each side so that scrolling stays
/// smooth.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn visible_range(
    count: usize,
    scroll_offset: f64,
    viewport: f64,
    row_height: f64,
    overscan: usize,
) -> Range<usize> {
    if count == 0 || row_height <= 0.0 || !row_height.is_finite() {
        return 0..0;
    }

    // Non finite or negative values are read as "top of the list"
    let offset = if scroll_offset.is_finite() { scroll_offset.max(0.0) } else { 0.0 };
    let viewport = if viewport.is_finite() { viewport.max(0.0) } else { 0.0 };

    let first = ((offset / row_height).floor() as usize).min(count - 1);
    let last = (((offset + viewport) / row_height).ceil() as usize).clamp(first + 1, count);

    first.saturating_sub(overscan)..(last + overscan).min(count)
}
