use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rayon::prelude::*;

/// Minimum number of items before a progress bar is shown
const PROGRESS_THRESHOLD: usize = 10;

/// Progress tracker for displaying progress during rendering
#[derive(Debug, Default)]
pub struct ProgressTracker {
    enabled: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker; `enabled = false` never draws
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Run `operation` over `items` in parallel, keeping results in input order
    pub fn track_parallel_progress<T, F, R>(&self, items: &[T], label: impl Fn(&T) -> String + Sync, operation: F) -> Vec<R>
    where
        T: Sync,
        F: Fn(&T) -> R + Sync + Send,
        R: Send,
    {
        let progress_bar = self.progress_bar(items.len());
        let processed_count = AtomicUsize::new(0);

        let results: Vec<R> = items.par_iter()
            .map(|item| {
                let result = operation(item);

                let current_count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(pb) = &progress_bar {
                    pb.set_position(current_count as u64);

                    // Update message occasionally to avoid too many redraws
                    if current_count % 10 == 0 || current_count == items.len() {
                        pb.set_message(label(item));
                    }
                }

                result
            })
            .collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Generation complete");
        }

        results
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.enabled || len <= PROGRESS_THRESHOLD {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} classes {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => debug!("Invalid progress template: {}", e),
        }
        Some(pb)
    }
}
