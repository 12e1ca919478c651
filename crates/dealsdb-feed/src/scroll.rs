/// Lifecycle of the feed between fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    /// Every page of the current filter generation is rendered.
    Exhausted,
    /// The last fetch failed; counters still describe the last good page.
    Error,
}

/// Paging counters of the current filter generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Last page rendered (1-based).
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub has_more_pages: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            is_loading: false,
            has_more_pages: true,
        }
    }
}

impl ScrollState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a successfully fetched page.
    pub fn apply_page(&mut self, page_index: u32, total_count: u64, page_size: u32) {
        self.total_pages = total_pages(total_count, page_size);
        self.current_page = page_index.clamp(1, self.total_pages);
        self.has_more_pages = self.current_page < self.total_pages;
    }
}

/// `max(1, ceil(total / page_size))`.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Viewport geometry reported with a scroll event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
    /// Distance scrolled from the top.
    pub offset: u32,
    pub viewport: u32,
    pub content_height: u32,
}

impl ScrollPosition {
    /// Returns `true` when the bottom of the viewport is within `threshold`
    /// pixels of the end of the content.
    #[must_use]
    pub fn near_bottom(&self, threshold: u32) -> bool {
        self.offset
            .saturating_add(self.viewport)
            .saturating_add(threshold)
            >= self.content_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_and_never_drops_below_one() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn apply_page_tracks_remaining_pages() {
        let mut s = ScrollState::default();
        s.apply_page(1, 25, 10);
        assert!(s.has_more_pages);
        s.apply_page(2, 25, 10);
        assert!(s.has_more_pages);
        s.apply_page(3, 25, 10);
        assert!(!s.has_more_pages);
        assert_eq!(s.total_pages, 3);
    }

    #[test]
    fn reset_restores_first_page() {
        let mut s = ScrollState::default();
        s.apply_page(3, 25, 10);
        s.is_loading = true;
        s.reset();
        assert_eq!(
            s,
            ScrollState {
                current_page: 1,
                total_pages: 1,
                is_loading: false,
                has_more_pages: true,
            }
        );
    }

    #[test]
    fn near_bottom_uses_threshold() {
        let pos = ScrollPosition {
            offset: 1200,
            viewport: 800,
            content_height: 2400,
        };
        assert!(pos.near_bottom(400));
        assert!(!pos.near_bottom(300));
    }
}
