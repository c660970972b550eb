use std::ops::RangeInclusive;

use serde::Serialize;

use super::ValidationError;

/// Read-only snapshot of the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub total_pages: u32,
    pub window_start: u32,
    pub window_end: u32,
    /// Pages in the current window; smaller than the configured size for a short tail.
    pub window_size: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl WindowInfo {
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.window_start..=self.window_end
    }

    pub fn range_label(&self) -> String {
        format!("{}-{}", self.window_start, self.window_end)
    }
}

/// Tracks a bounded, contiguous page range over a document and moves it with a
/// configurable overlap.
///
/// Invariant: `1 <= start <= end <= total_pages` and `end - start + 1 <= window_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowManager {
    total_pages: u32,
    window_size: u32,
    current_start: u32,
}

impl WindowManager {
    pub const DEFAULT_WINDOW_SIZE: u32 = 20;

    pub fn new(total_pages: u32, window_size: u32) -> Result<Self, ValidationError> {
        if total_pages == 0 {
            return Err(ValidationError::EmptyDocument);
        }
        if window_size == 0 {
            return Err(ValidationError::ZeroWindowSize);
        }
        Ok(Self {
            total_pages,
            window_size,
            current_start: 1,
        })
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn current_start(&self) -> u32 {
        self.current_start
    }

    /// Overlaps at or above the window size would stall or reverse the window.
    pub fn check_overlap(&self, overlap: u32) -> Result<(), ValidationError> {
        if overlap >= self.window_size {
            return Err(ValidationError::OverlapNotBelowWindowSize {
                overlap,
                window_size: self.window_size,
            });
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_start = 1;
    }

    fn current_end(&self) -> u32 {
        self.current_start
            .saturating_add(self.window_size - 1)
            .min(self.total_pages)
    }

    pub fn current_window_pages(&self) -> Vec<u32> {
        (self.current_start..=self.current_end()).collect()
    }

    /// Moves forward so the next window shares `overlap` pages with this one.
    /// Returns `false` without moving when the current window already reaches the end.
    pub fn advance(&mut self, overlap: u32) -> Result<bool, ValidationError> {
        self.check_overlap(overlap)?;

        let next = match self.current_start.checked_add(self.window_size) {
            Some(past_end) if past_end <= self.total_pages => past_end - overlap,
            _ => return Ok(false),
        };
        self.current_start = next;
        Ok(true)
    }

    /// Mirror of [`advance`](Self::advance); clamps at page 1.
    pub fn retreat(&mut self, overlap: u32) -> Result<bool, ValidationError> {
        self.check_overlap(overlap)?;

        if self.current_start <= 1 {
            return Ok(false);
        }

        self.current_start = self
            .current_start
            .saturating_sub(self.window_size - overlap)
            .max(1);
        Ok(true)
    }

    pub fn seek(&mut self, start_page: u32) -> bool {
        if start_page < 1 || start_page > self.total_pages {
            return false;
        }
        self.current_start = start_page;
        true
    }

    pub fn window_info(&self) -> WindowInfo {
        let end = self.current_end();
        WindowInfo {
            total_pages: self.total_pages,
            window_start: self.current_start,
            window_end: end,
            window_size: end - self.current_start + 1,
            has_previous: self.current_start > 1,
            has_next: end < self.total_pages,
        }
    }
}
