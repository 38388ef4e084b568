//! Paginator bar for one route category: `« 1 [2] 3 »`, with the pages
//! past the twelfth collapsed into an overflow selector.

use ratatui::text::{Line, Span};

use birdglass_core::{PageLink, PageSelect, PaginatorView};

use crate::theme;

fn control(link: &PageLink) -> Span<'static> {
    let style = if link.is_disabled() {
        theme::page_disabled()
    } else {
        theme::page_link()
    };
    Span::styled(link.label.clone(), style)
}

fn page(link: &PageLink) -> Span<'static> {
    if link.active {
        Span::styled(format!("[{}]", link.label), theme::page_active())
    } else {
        Span::styled(link.label.clone(), theme::page_link())
    }
}

fn select(select: &PageSelect) -> Span<'static> {
    let first = select.options.first().map_or(0, |p| p + 1);
    let last = select.options.last().map_or(0, |p| p + 1);
    if select.active {
        Span::styled(
            format!("[{}] of {first}-{last}", select.selected.saturating_add(1)),
            theme::page_active(),
        )
    } else {
        Span::styled(
            format!("+{} more ({first}-{last})", select.options.len()),
            theme::page_link(),
        )
    }
}

pub fn paginator_line(view: &PaginatorView) -> Line<'static> {
    let mut items = vec![control(&view.prev)];
    items.extend(view.links.iter().map(page));
    if let Some(ref s) = view.select {
        items.push(select(s));
    }
    if let Some(ref next) = view.next {
        items.push(control(next));
    }

    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(item);
    }
    Line::from(spans)
}
