//! Responsive placement of the dashboard views.
//!
//! [`compute_layout`] is a pure function of the terminal size and the list of tall
//! panels: the left third holds the project header, the tall panels and (below
//! everything) the options bar spans the full width; the main view takes the rest.

use crate::model::{PanelKind, ViewId};

pub const MIN_WIDTH: u16 = 9;
pub const MIN_HEIGHT: u16 = 10;

pub const NOT_ENOUGH_SPACE: &str = "Not Enough Space";

const PROJECT_HEIGHT: u16 = 3;
const OPTIONS_HEIGHT: u16 = 1;

/// Inclusive cell rectangle, `(x0, y0)` top-left to `(x1, y1)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Rect {
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Rows available inside a one-cell border.
    pub fn inner_height(&self) -> usize {
        self.height().saturating_sub(2) as usize
    }

    /// Columns available inside a one-cell border.
    pub fn inner_width(&self) -> usize {
        self.width().saturating_sub(2) as usize
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub id: ViewId,
    pub rect: Rect,
    pub title: String,
    pub wrap: bool,
    pub focusable: bool,
}

impl View {
    fn new(id: ViewId, rect: Rect, title: &str, focusable: bool) -> Self {
        Self {
            id,
            rect,
            title: title.to_string(),
            wrap: false,
            focusable,
        }
    }
}

pub fn is_too_small(width: u16, height: u16) -> bool {
    width < MIN_WIDTH || height < MIN_HEIGHT
}

/// Place every view for a `width` x `height` terminal with `panels` stacked in the
/// left column, top to bottom. Below the minimum size only the placeholder is
/// returned.
pub fn compute_layout(width: u16, height: u16, panels: &[PanelKind]) -> Vec<View> {
    if is_too_small(width, height) {
        let mut limit = View::new(
            ViewId::Limit,
            Rect::new(0, 0, width.saturating_sub(1), height.saturating_sub(1)),
            NOT_ENOUGH_SPACE,
            false,
        );
        limit.wrap = true;
        return vec![limit];
    }

    let left_width = width / 3;
    let bottom = height - OPTIONS_HEIGHT - 1; // last row above the options bar
    let mut views = Vec::with_capacity(panels.len() + 3);

    views.push(View::new(
        ViewId::Panel(PanelKind::Project),
        Rect::new(0, 0, left_width - 1, PROJECT_HEIGHT - 1),
        PanelKind::Project.title(),
        true,
    ));

    let mut y = PROJECT_HEIGHT;
    for (kind, h) in panels.iter().zip(panel_heights(height, panels.len())) {
        views.push(View::new(
            ViewId::Panel(*kind),
            Rect::new(0, y, left_width - 1, y + h - 1),
            kind.title(),
            true,
        ));
        y += h;
    }

    views.push(View::new(ViewId::Main, Rect::new(left_width, 0, width - 1, bottom), "", true));
    views.push(View::new(
        ViewId::Options,
        Rect::new(0, height - 1, width - 1, height - 1),
        "",
        false,
    ));
    views
}

/// Split `height - 4` rows evenly across `count` panels; the remainder goes to the
/// first panel.
pub fn panel_heights(height: u16, count: usize) -> Vec<u16> {
    if count == 0 {
        return Vec::new();
    }
    let usable = height.saturating_sub(PROJECT_HEIGHT + OPTIONS_HEIGHT);
    let count16 = count as u16;
    let base = usable / count16;
    let remainder = usable % count16;
    let mut heights = vec![base; count];
    heights[0] += remainder;
    heights
}

/// Centred popup big enough for `lines` rows of `content_width` columns plus a
/// border, clamped to the terminal.
pub fn popup_rect(width: u16, height: u16, lines: usize, content_width: usize) -> Rect {
    let w = (content_width as u16).saturating_add(4).min(width.saturating_sub(2)).max(3);
    let h = (lines as u16).saturating_add(2).min(height.saturating_sub(2)).max(3);
    let x0 = width.saturating_sub(w) / 2;
    let y0 = height.saturating_sub(h) / 2;
    Rect::new(x0, y0, x0 + w - 1, y0 + h - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const THREE: [PanelKind; 3] = [PanelKind::Services, PanelKind::Containers, PanelKind::Images];
    const FOUR: [PanelKind; 4] = [
        PanelKind::Services,
        PanelKind::Containers,
        PanelKind::Images,
        PanelKind::Volumes,
    ];

    fn tall_panels(views: &[View]) -> Vec<&View> {
        views
            .iter()
            .filter(|v| matches!(v.id, ViewId::Panel(k) if k != PanelKind::Project))
            .collect()
    }

    #[test]
    fn too_small_gives_placeholder_only() {
        for (w, h) in [(8, 40), (120, 9), (0, 0), (1, 1)] {
            let views = compute_layout(w, h, &THREE);
            assert_eq!(views.len(), 1);
            assert_eq!(views[0].id, ViewId::Limit);
            assert_eq!(views[0].title, NOT_ENOUGH_SPACE);
            assert!(views[0].wrap);
        }
    }

    #[test]
    fn minimum_size_is_usable() {
        let views = compute_layout(MIN_WIDTH, MIN_HEIGHT, &THREE);
        assert_eq!(tall_panels(&views).len(), 3);
    }

    #[test]
    fn remainder_goes_to_first_panel() {
        // usable = 27 - 4 = 23 = 3 * 7 + 2
        assert_eq!(panel_heights(27, 3), vec![9, 7, 7]);
        assert_eq!(panel_heights(24, 4), vec![5, 5, 5, 5]);
        assert!(panel_heights(24, 0).is_empty());
    }

    #[test]
    fn standard_geometry() {
        let views = compute_layout(120, 40, &THREE);
        let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["project", "services", "containers", "images", "main", "options"]);

        let main = views.iter().find(|v| v.id == ViewId::Main).unwrap();
        assert_eq!(main.rect, Rect::new(40, 0, 119, 38));
        let services = views.iter().find(|v| v.id == ViewId::Panel(PanelKind::Services)).unwrap();
        assert_eq!(services.rect, Rect::new(0, 3, 39, 14));
        let options = views.iter().find(|v| v.id == ViewId::Options).unwrap();
        assert_eq!(options.rect, Rect::new(0, 39, 119, 39));
        assert!(!options.focusable);
    }

    #[test]
    fn popup_is_centred_and_clamped() {
        let r = popup_rect(100, 30, 4, 20);
        assert_eq!((r.width(), r.height()), (24, 6));
        assert_eq!((r.x0, r.y0), (38, 12));

        let tiny = popup_rect(10, 10, 50, 200);
        assert!(tiny.x1 < 10 && tiny.y1 < 10);
    }

    fn check_partition(width: u16, height: u16, panels: &[PanelKind]) {
        let views = compute_layout(width, height, panels);
        let tall = tall_panels(&views);
        assert_eq!(tall.len(), panels.len());

        let total: u16 = tall.iter().map(|v| v.rect.height()).sum();
        assert_eq!(total, height - 4);
        let usable = height - 4;
        let n = panels.len() as u16;
        assert_eq!(tall[0].rect.height(), usable / n + usable % n);

        for (i, a) in views.iter().enumerate() {
            assert!(a.rect.x1 < width && a.rect.y1 < height);
            for b in &views[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.id, b.id);
            }
        }
    }

    proptest! {
        #[test]
        fn three_panels_partition_without_overlap(width in MIN_WIDTH..400u16, height in MIN_HEIGHT..200u16) {
            check_partition(width, height, &THREE);
        }

        #[test]
        fn four_panels_partition_without_overlap(width in MIN_WIDTH..400u16, height in MIN_HEIGHT..200u16) {
            check_partition(width, height, &FOUR);
        }

        #[test]
        fn below_minimum_is_single_placeholder(width in 0u16..20, height in 0u16..20) {
            prop_assume!(is_too_small(width, height));
            let views = compute_layout(width, height, &FOUR);
            prop_assert_eq!(views.len(), 1);
            prop_assert_eq!(views[0].title.as_str(), NOT_ENOUGH_SPACE);
        }

        #[test]
        fn layout_is_idempotent(width in 0u16..300, height in 0u16..120) {
            prop_assert_eq!(compute_layout(width, height, &THREE), compute_layout(width, height, &THREE));
        }
    }
}
