//! Pagination strip

use std::ops::RangeInclusive;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageControl {
    Previous { enabled: bool },
    Page { number: u32, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Numbered pages shown around `current`: at most `max_visible`, shifted to
/// stay inside `[1, total_pages]`.
pub fn page_window(current: u32, total_pages: u32, max_visible: u32) -> RangeInclusive<u32> {
    let total_pages = total_pages.max(1);
    let max_visible = max_visible.max(1);
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total_pages);
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    start..=end
}

/// Full strip; empty when everything fits on one page.
pub fn page_controls(current: u32, total_pages: u32, max_visible: u32) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let window = page_window(current, total_pages, max_visible);
    let (start, end) = (*window.start(), *window.end());

    let mut controls = vec![PageControl::Previous {
        enabled: current > 1,
    }];

    if start > 1 {
        controls.push(PageControl::Page {
            number: 1,
            active: false,
        });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    controls.extend(window.map(|number| PageControl::Page {
        number,
        active: number == current,
    }));

    if end < total_pages {
        if end < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page {
            number: total_pages,
            active: false,
        });
    }

    controls.push(PageControl::Next {
        enabled: current < total_pages,
    });
    controls
}
