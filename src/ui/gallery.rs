// Gallery section: heading plus rows of reel cards
// Rows come from the LayoutChunker; each card gets its own player

use gtk4::prelude::*;
use gtk4::{glib, Adjustment, Align, Box as GtkBox, Label, Orientation, PolicyType, ScrolledWindow};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::card::ReelCard;
use super::reveal::visible_fraction;
use crate::config::GalleryConfig;
use crate::layout::LayoutChunker;
use crate::models::{ReelItem, RowMode};

const ROW_SPACING: i32 = 12;
const SECTION_MARGIN: i32 = 16;
const MIN_CARD_WIDTH: i32 = 80;

struct RenderedRow {
    container: GtkBox,
    mode: RowMode,
    columns: usize,
    cards: Vec<ReelCard>,
}

/// Pixel width of one column in a row of `columns` target slots.
///
/// Short rows use the same column width as full rows so they never stretch.
fn column_width(available: i32, columns: usize) -> i32 {
    let columns = columns.max(1) as i32;
    let usable = available - 2 * SECTION_MARGIN - ROW_SPACING * (columns - 1);
    (usable / columns).max(MIN_CARD_WIDTH)
}

fn layout_rows(rows: &[RenderedRow], available: i32) {
    if available <= 0 {
        return;
    }
    for row in rows {
        let width = column_width(available, row.columns);
        for card in &row.cards {
            card.set_tile_width(width, row.mode);
        }
    }
}

/// Visible fraction of a card whose bounds are given relative to the
/// gallery content box. The vertical adjustment scrolls the viewport child,
/// which places the content box `content_margin_top` pixels down.
fn card_visible_fraction(
    card_top: f64,
    card_height: f64,
    content_margin_top: i32,
    vadj_value: f64,
    vadj_page_size: f64,
) -> f64 {
    visible_fraction(
        card_top + content_margin_top as f64,
        card_height,
        vadj_value,
        vadj_page_size,
    )
}

fn check_reveals(rows: &[RenderedRow], content: &GtkBox, vadj: &Adjustment) {
    let margin_top = content.margin_top();
    for card in rows.iter().flat_map(|row| row.cards.iter()) {
        if card.is_revealed() {
            continue;
        }
        if let Some(bounds) = card.compute_bounds(content) {
            card.observe_visibility(card_visible_fraction(
                bounds.y() as f64,
                bounds.height() as f64,
                margin_top,
                vadj.value(),
                vadj.page_size(),
            ));
        }
    }
}

/// Scrollable reel section: heading, empty state, and chunked rows.
pub struct GallerySection {
    scrolled_window: ScrolledWindow,
    content: GtkBox,
    rows_box: GtkBox,
    empty_label: Label,
    config: Rc<GalleryConfig>,
    chunker: LayoutChunker,
    rows: Rc<RefCell<Vec<RenderedRow>>>,
    viewport_width: Rc<Cell<i32>>,
    adjustment_handlers: RefCell<Vec<(Adjustment, glib::SignalHandlerId)>>,
}

impl GallerySection {
    pub fn new(config: Rc<GalleryConfig>) -> Self {
        let heading = Label::new(Some(&config.title));
        heading.set_halign(Align::Start);
        heading.add_css_class("section-title");

        let empty_label = Label::new(Some("> No reels to show"));
        empty_label.set_halign(Align::Start);
        empty_label.add_css_class("muted");
        empty_label.set_visible(false);

        let rows_box = GtkBox::new(Orientation::Vertical, ROW_SPACING);
        rows_box.add_css_class("reel-rows");

        let content = GtkBox::new(Orientation::Vertical, ROW_SPACING);
        content.add_css_class("gallery");
        content.set_margin_start(SECTION_MARGIN);
        content.set_margin_end(SECTION_MARGIN);
        content.set_margin_top(SECTION_MARGIN);
        content.set_margin_bottom(SECTION_MARGIN);
        content.append(&heading);
        content.append(&empty_label);
        content.append(&rows_box);

        let scrolled_window = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .kinetic_scrolling(true)
            .child(&content)
            .build();
        scrolled_window.set_hexpand(true);
        scrolled_window.set_vexpand(true);

        let chunker = config.chunker();
        tracing::debug!(pattern = ?chunker.pattern(), "gallery row pattern");
        let gallery = Self {
            scrolled_window,
            content,
            rows_box,
            empty_label,
            config,
            chunker,
            rows: Rc::new(RefCell::new(Vec::new())),
            viewport_width: Rc::new(Cell::new(0)),
            adjustment_handlers: RefCell::new(Vec::new()),
        };
        gallery.connect_viewport();
        gallery
    }

    /// Get the scrolled window widget to add to the window
    pub fn widget(&self) -> &ScrolledWindow {
        &self.scrolled_window
    }

    fn connect_viewport(&self) {
        let mut handlers = self.adjustment_handlers.borrow_mut();
        let vadj = self.scrolled_window.vadjustment();
        let hadj = self.scrolled_window.hadjustment();

        // Scrolling and content growth can bring cards into view.
        let rows = self.rows.clone();
        let content = self.content.clone();
        let id = vadj.connect_value_changed(move |vadj| {
            check_reveals(&rows.borrow(), &content, vadj);
        });
        handlers.push((vadj.clone(), id));

        let rows = self.rows.clone();
        let content = self.content.clone();
        let id = vadj.connect_changed(move |vadj| {
            check_reveals(&rows.borrow(), &content, vadj);
        });
        handlers.push((vadj.clone(), id));

        // The horizontal page size tracks the viewport width.
        let rows = self.rows.clone();
        let viewport_width = self.viewport_width.clone();
        let id = hadj.connect_page_size_notify(move |hadj| {
            let width = hadj.page_size().floor() as i32;
            if width != viewport_width.get() {
                viewport_width.set(width);
                layout_rows(&rows.borrow(), width);
            }
        });
        handlers.push((hadj, id));
    }

    /// Replace the gallery content. An empty list shows the empty state.
    pub fn set_items(&self, items: Vec<ReelItem>) {
        self.clear();

        if items.is_empty() {
            tracing::info!("No reels to render, showing empty state");
            self.empty_label.set_visible(true);
            return;
        }
        self.empty_label.set_visible(false);

        let groups = self.chunker.chunk(&items);
        let mut rendered = Vec::with_capacity(groups.len());
        for group in groups {
            if group.is_short() {
                tracing::debug!(
                    row = group.row_index,
                    items = group.items.len(),
                    columns = group.columns,
                    "short final row"
                );
            }
            let container = GtkBox::new(Orientation::Horizontal, ROW_SPACING);
            container.set_halign(Align::Start);
            container.add_css_class("reel-row");
            container.add_css_class(group.mode.css_class());

            let cards: Vec<ReelCard> = group
                .items
                .iter()
                .map(|item| {
                    let card = ReelCard::new();
                    card.bind(item, &self.config);
                    container.append(&card);
                    card
                })
                .collect();

            self.rows_box.append(&container);
            rendered.push(RenderedRow {
                container,
                mode: group.mode,
                columns: group.columns,
                cards,
            });
        }
        tracing::info!(
            "Rendered {} reels in {} rows",
            items.len(),
            rendered.len()
        );

        layout_rows(&rendered, self.viewport_width.get());
        *self.rows.borrow_mut() = rendered;

        let rows = self.rows.clone();
        let content = self.content.clone();
        let vadj = self.scrolled_window.vadjustment();
        glib::idle_add_local_once(move || {
            check_reveals(&rows.borrow(), &content, &vadj);
        });
    }

    /// Number of cards currently rendered.
    pub fn card_count(&self) -> usize {
        self.rows.borrow().iter().map(|row| row.cards.len()).sum()
    }

    /// Tear down every card and row.
    pub fn clear(&self) {
        let rows = std::mem::take(&mut *self.rows.borrow_mut());
        for row in rows {
            for card in &row.cards {
                tracing::trace!(key = %card.key(), "unbinding reel card");
                card.unbind();
            }
            self.rows_box.remove(&row.container);
        }
    }
}

impl Drop for GallerySection {
    fn drop(&mut self) {
        for (adjustment, handler) in self.adjustment_handlers.borrow_mut().drain(..) {
            adjustment.disconnect(handler);
        }
        self.clear();
    }
}
