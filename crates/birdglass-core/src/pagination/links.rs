// ── Page links ──

use serde::Serialize;

use super::cursors::PageCursors;
use super::location::{LocationDescriptor, compute_target};
use crate::model::RouteCategory;

/// Pages beyond this many are only reachable through the selector.
pub const MAX_DIRECT_LINKS: usize = 12;

/// Zero-based page ids split into direct links and an overflow selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinkSet {
    pub items: Vec<usize>,
    pub select: Vec<usize>,
}

/// `build_page_link_set` with the standard 12 direct links.
pub fn build_page_link_set(total_pages: usize) -> PageLinkSet {
    PageLinkSet::new(total_pages, MAX_DIRECT_LINKS)
}

impl PageLinkSet {
    /// `items = [0, min(total, max))`, `select = [max, total)`.
    /// Nothing to paginate when there is at most one page.
    pub fn new(total_pages: usize, max_direct_links: usize) -> Self {
        if total_pages <= 1 {
            return Self::default();
        }
        let split = total_pages.min(max_direct_links);
        Self {
            items: (0..split).collect(),
            select: (split..total_pages).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.select.is_empty()
    }

    /// Overflow selector state for the active page, if there is an overflow.
    pub fn select_for(&self, page: usize) -> Option<PageSelect> {
        let first = *self.select.first()?;
        Some(PageSelect {
            more: (page < first).then_some(first),
            options: self.select.clone(),
            active: page >= first,
            selected: page,
        })
    }

    /// A "next" control is only offered when every page has a direct link.
    pub fn offers_next(&self) -> bool {
        !self.items.is_empty() && self.select.is_empty()
    }
}

/// Dropdown over the overflow pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSelect {
    /// Synthetic leading "more..." option, pointing at the first overflow page.
    /// Present only while the active page is still among the direct links.
    pub more: Option<usize>,
    pub options: Vec<usize>,
    /// The active page lies inside the overflow range.
    pub active: bool,
    pub selected: usize,
}

/// One rendered control of a paginator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub label: String,
    pub active: bool,
    /// `None` when the control is disabled.
    #[serde(skip)]
    pub target: Option<LocationDescriptor>,
}

impl PageLink {
    pub fn is_disabled(&self) -> bool {
        self.target.is_none()
    }
}

/// Everything needed to draw the paginator of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatorView {
    pub category: RouteCategory,
    pub prev: PageLink,
    pub links: Vec<PageLink>,
    pub select: Option<PageSelect>,
    pub next: Option<PageLink>,
}

impl PaginatorView {
    /// `None` when the category fits on one page.
    pub fn new(
        category: RouteCategory,
        cursors: PageCursors,
        total_pages: usize,
        current: &LocationDescriptor,
    ) -> Option<Self> {
        let set = build_page_link_set(total_pages);
        if set.is_empty() {
            return None;
        }
        let page = cursors.get(category);
        let target = |p: usize| compute_target(cursors, category, p, current);

        let prev = PageLink {
            page: page.saturating_sub(1),
            label: "«".into(),
            active: false,
            target: page.checked_sub(1).map(target),
        };

        let links = set
            .items
            .iter()
            .map(|&p| PageLink {
                page: p,
                label: (p + 1).to_string(),
                active: p == page,
                target: Some(target(p)),
            })
            .collect();

        let following = page.checked_add(1).filter(|&p| p < total_pages);
        let next = set.offers_next().then(|| PageLink {
            page: following.unwrap_or(page),
            label: "»".into(),
            active: false,
            target: following.map(target),
        });

        Some(Self {
            category,
            prev,
            links,
            select: set.select_for(page),
            next,
        })
    }

    /// Location for an arbitrary page of this category, e.g. from the selector.
    pub fn target_for(
        &self,
        page: usize,
        cursors: PageCursors,
        current: &LocationDescriptor,
    ) -> LocationDescriptor {
        compute_target(cursors, self.category, page, current)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn five_pages_are_all_direct_links() {
        let set = build_page_link_set(5);
        assert_eq!(set.items, vec![0, 1, 2, 3, 4]);
        assert!(set.select.is_empty());
        assert!(set.offers_next());
    }

    #[test]
    fn fifteen_pages_overflow_into_select() {
        let set = build_page_link_set(15);
        assert_eq!(set.items, (0..12).collect::<Vec<_>>());
        assert_eq!(set.select, vec![12, 13, 14]);
        assert!(!set.offers_next());
    }

    #[test]
    fn single_page_is_empty() {
        assert!(build_page_link_set(0).is_empty());
        assert!(build_page_link_set(1).is_empty());
        assert_eq!(build_page_link_set(12).select, Vec::<usize>::new());
        assert_eq!(build_page_link_set(13).select, vec![12]);
    }

    #[test]
    fn more_option_only_before_overflow() {
        let set = build_page_link_set(15);

        let below = set.select_for(3).unwrap();
        assert_eq!(below.more, Some(12));
        assert!(!below.active);

        let inside = set.select_for(13).unwrap();
        assert_eq!(inside.more, None);
        assert!(inside.active);

        assert!(build_page_link_set(5).select_for(0).is_none());
    }

    #[test]
    fn prev_next_disabled_at_edges() {
        let here = LocationDescriptor::search("AS64500");

        let first = PaginatorView::new(RouteCategory::Received, PageCursors::default(), 3, &here)
            .unwrap();
        assert!(first.prev.is_disabled());
        assert!(!first.next.as_ref().unwrap().is_disabled());
        assert!(first.links[0].active);

        let last = PaginatorView::new(
            RouteCategory::Received,
            PageCursors::new(2, 0, 0),
            3,
            &here,
        )
        .unwrap();
        assert!(!last.prev.is_disabled());
        assert!(last.next.as_ref().unwrap().is_disabled());
        assert_eq!(
            last.prev.target.as_ref().unwrap().cursors,
            PageCursors::new(1, 0, 0)
        );
    }

    #[test]
    fn overflow_paginator_has_no_next() {
        let here = LocationDescriptor::search("AS64500");
        let view = PaginatorView::new(
            RouteCategory::Filtered,
            PageCursors::new(5, 1, 0),
            20,
            &here,
        )
        .unwrap();
        assert!(view.next.is_none());
        assert_eq!(view.links.len(), 12);
        let link = &view.links[4];
        let target = link.target.as_ref().unwrap();
        assert_eq!(target.cursors, PageCursors::new(5, 4, 0));
        assert_eq!(target.anchor, Some(RouteCategory::Filtered));
        assert!(view.links[1].active);
        assert_eq!(view.select.unwrap().more, Some(12));
    }

    #[test]
    fn nothing_to_paginate() {
        let here = LocationDescriptor::search("x");
        assert!(PaginatorView::new(RouteCategory::Received, PageCursors::default(), 1, &here)
            .is_none());
    }

    #[test]
    fn last_representable_page_has_no_next_target() {
        let current = LocationDescriptor::search("AS64500");
        let cursors = PageCursors::new(usize::MAX, 0, 0);
        let view = PaginatorView::new(RouteCategory::Received, cursors, 5, &current).unwrap();
        let next = view.next.unwrap();
        assert!(next.is_disabled());
        assert_eq!(next.page, usize::MAX);
        assert!(!view.prev.is_disabled());
    }
}
