// Reel card widget: one video tile with its own playback chrome
// Every card owns an independent Player; nothing is shared between cards

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    gdk, glib, Align, Box as GtkBox, Button, ContentFit, Label, Orientation, Overlay, Picture,
    Revealer, RevealerTransitionType, Scale, Spinner, Stack,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::GalleryConfig;
use crate::models::{RowItem, RowMode};
use crate::ui::reveal::RevealOnce;
use crate::video::{
    attach_listeners, Change, ListenerGuard, PlaybackStatus, Player, StreamElement,
};

const PAGE_VIDEO: &str = "video";
const PAGE_ERROR: &str = "error";

mod imp {
    use super::*;

    pub struct CardWidgets {
        pub stack: Stack,
        pub picture: Picture,
        pub spinner: Spinner,
        pub title: Label,
        pub controls: GtkBox,
        pub play_btn: Button,
        pub mute_btn: Button,
        pub seek_scale: Scale,
        pub time_label: Label,
        pub description_btn: Button,
        pub description_revealer: Revealer,
        pub description_label: Label,
    }

    #[derive(Default)]
    pub struct ReelCardInner {
        pub widgets: RefCell<Option<CardWidgets>>,
        pub player: RefCell<Option<Rc<Player<StreamElement>>>>,
        pub listeners: RefCell<Option<ListenerGuard>>,
        pub key: RefCell<String>,
        pub autoplay: Cell<bool>,
        pub autoplay_issued: Cell<bool>,
        /// Set while the scale is updated from playback, not by the user.
        pub seek_syncing: Cell<bool>,
        pub description_open: Cell<bool>,
        pub reveal: Cell<RevealOnce>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ReelCardInner {
        const NAME: &'static str = "ReelgridReelCard";
        type Type = super::ReelCard;
        type ParentType = GtkBox;
    }

    impl ObjectImpl for ReelCardInner {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_orientation(Orientation::Vertical);
            obj.set_spacing(6);
            obj.set_halign(Align::Start);
            obj.set_valign(Align::Start);
            obj.add_css_class("reel-card");
            obj.setup_widgets();
        }

        fn dispose(&self) {
            self.obj().unbind();
        }
    }

    impl WidgetImpl for ReelCardInner {}
    impl BoxImpl for ReelCardInner {}
}

glib::wrapper! {
    pub struct ReelCard(ObjectSubclass<imp::ReelCardInner>)
        @extends GtkBox, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl ReelCard {
    pub fn new() -> Self {
        Object::builder().build()
    }

    fn setup_widgets(&self) {
        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);
        picture.add_css_class("reel-video");

        let error_label = Label::new(Some("[MEDIA ERROR]\nThis reel could not be played"));
        error_label.set_justify(gtk4::Justification::Center);
        error_label.set_wrap(true);
        error_label.add_css_class("reel-error");

        let stack = Stack::new();
        stack.add_named(&picture, Some(PAGE_VIDEO));
        stack.add_named(&error_label, Some(PAGE_ERROR));
        stack.set_visible_child_name(PAGE_VIDEO);

        let spinner = Spinner::new();
        spinner.set_halign(Align::Center);
        spinner.set_valign(Align::Center);
        spinner.set_size_request(32, 32);

        let overlay = Overlay::new();
        overlay.set_child(Some(&stack));
        overlay.add_overlay(&spinner);
        overlay.add_css_class("reel-frame");

        let title = Label::new(None);
        title.set_halign(Align::Start);
        title.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        title.add_css_class("reel-title");

        let play_btn = Button::with_label("[PLAY]");
        play_btn.set_tooltip_text(Some("Play/Pause"));

        let mute_btn = Button::with_label("[MUTED]");
        mute_btn.set_tooltip_text(Some("Mute/Unmute"));

        let seek_scale = Scale::with_range(Orientation::Horizontal, 0.0, 1.0, 0.001);
        seek_scale.set_hexpand(true);
        seek_scale.set_draw_value(false);
        seek_scale.set_sensitive(false);
        seek_scale.set_tooltip_text(Some("Seek within reel"));

        let time_label = Label::new(Some("0:00 / 0:00"));
        time_label.add_css_class("muted");

        let controls = GtkBox::new(Orientation::Horizontal, 6);
        controls.add_css_class("reel-controls");
        controls.append(&play_btn);
        controls.append(&mute_btn);
        controls.append(&seek_scale);
        controls.append(&time_label);

        let description_btn = Button::with_label("[MORE]");
        description_btn.set_halign(Align::Start);
        description_btn.set_visible(false);

        let description_label = Label::new(None);
        description_label.set_wrap(true);
        description_label.set_xalign(0.0);
        description_label.add_css_class("reel-description");

        let description_revealer = Revealer::new();
        description_revealer.set_transition_type(RevealerTransitionType::SlideDown);
        description_revealer.set_child(Some(&description_label));
        description_revealer.set_reveal_child(false);

        self.append(&overlay);
        self.append(&title);
        self.append(&controls);
        self.append(&description_btn);
        self.append(&description_revealer);

        let card_weak = self.downgrade();
        play_btn.connect_clicked(move |_| {
            if let Some(card) = card_weak.upgrade() {
                card.toggle_play();
            }
        });

        let card_weak = self.downgrade();
        mute_btn.connect_clicked(move |_| {
            if let Some(card) = card_weak.upgrade() {
                card.toggle_mute();
            }
        });

        let card_weak = self.downgrade();
        seek_scale.connect_value_changed(move |scale| {
            let Some(card) = card_weak.upgrade() else {
                return;
            };
            if card.imp().seek_syncing.get() {
                return;
            }
            if let Some(player) = card.player() {
                player.seek(scale.value());
            }
        });

        let card_weak = self.downgrade();
        description_btn.connect_clicked(move |_| {
            if let Some(card) = card_weak.upgrade() {
                card.toggle_description();
            }
        });

        *self.imp().widgets.borrow_mut() = Some(imp::CardWidgets {
            stack,
            picture,
            spinner,
            title,
            controls,
            play_btn,
            mute_btn,
            seek_scale,
            time_label,
            description_btn,
            description_revealer,
            description_label,
        });
    }

    /// Bind a reel to this card, replacing any previous element.
    pub fn bind(&self, item: &RowItem, config: &GalleryConfig) {
        self.unbind();

        let imp = self.imp();
        imp.key.replace(item.key.clone());
        imp.autoplay.set(config.autoplay);
        imp.autoplay_issued.set(false);

        let player = Rc::new(Player::new(
            StreamElement::new(config.looping),
            config.start_muted,
        ));
        let card_weak = self.downgrade();
        player.connect_changed(move |change| {
            if let Some(card) = card_weak.upgrade() {
                card.refresh(change);
            }
        });
        let listeners = attach_listeners(&player);

        if let Some(widgets) = imp.widgets.borrow().as_ref() {
            widgets.title.set_text(&item.reel.title);
            widgets
                .picture
                .set_paintable(Some(player.element().stream()));
            match item.reel.description() {
                Some(text) => {
                    widgets.description_label.set_text(text);
                    widgets.description_btn.set_visible(true);
                }
                None => {
                    widgets.description_label.set_text("");
                    widgets.description_btn.set_visible(false);
                }
            }
        }

        imp.listeners.replace(Some(listeners));
        imp.player.replace(Some(player.clone()));

        tracing::debug!(
            key = %item.key,
            position = item.position,
            source = %item.reel.source_url,
            "binding reel card"
        );
        player.element().load(&item.reel.source_url);
        self.refresh(Change::State);
    }

    /// Detach listeners and release the element. Safe to call repeatedly.
    pub fn unbind(&self) {
        let imp = self.imp();
        // Listeners first so teardown of the stream cannot reach the player.
        drop(imp.listeners.take());
        if let Some(player) = imp.player.take() {
            player.element().release();
        }

        if let Some(widgets) = imp.widgets.borrow().as_ref() {
            widgets.picture.set_paintable(Option::<&gdk::Paintable>::None);
            widgets.stack.set_visible_child_name(PAGE_VIDEO);
            widgets.controls.set_sensitive(true);
            widgets.description_revealer.set_reveal_child(false);
            widgets.description_btn.set_label("[MORE]");
        }
        imp.description_open.set(false);
        self.remove_css_class("errored");
    }

    pub fn key(&self) -> String {
        self.imp().key.borrow().clone()
    }

    fn player(&self) -> Option<Rc<Player<StreamElement>>> {
        self.imp().player.borrow().clone()
    }

    pub fn toggle_play(&self) {
        if let Some(player) = self.player() {
            player.toggle_play();
        }
    }

    pub fn toggle_mute(&self) {
        if let Some(player) = self.player() {
            player.toggle_mute();
        }
    }

    /// Expand or collapse the description panel. Local to this card.
    pub fn toggle_description(&self) {
        let imp = self.imp();
        let open = !imp.description_open.get();
        imp.description_open.set(open);
        if let Some(widgets) = imp.widgets.borrow().as_ref() {
            widgets.description_revealer.set_reveal_child(open);
            widgets
                .description_btn
                .set_label(if open { "[LESS]" } else { "[MORE]" });
        }
    }

    /// Size the video surface for a column of `width` pixels.
    pub fn set_tile_width(&self, width: i32, mode: RowMode) {
        let width = width.max(1);
        let height = ((width as f32) * mode.height_ratio()).round() as i32;
        self.set_size_request(width, -1);
        if let Some(widgets) = self.imp().widgets.borrow().as_ref() {
            widgets.picture.set_size_request(width, height.max(1));
        }
    }

    /// Feed the card's current visible fraction; runs the entrance
    /// transition the first time it is visible enough.
    pub fn observe_visibility(&self, fraction: f64) {
        let imp = self.imp();
        let mut reveal = imp.reveal.get();
        let fired = reveal.observe(fraction);
        imp.reveal.set(reveal);
        if fired {
            self.add_css_class("revealed");
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.imp().reveal.get().has_fired()
    }

    fn refresh(&self, change: Change) {
        let Some(player) = self.player() else {
            return;
        };
        let imp = self.imp();
        let state = player.state();

        {
            let widgets = imp.widgets.borrow();
            let Some(widgets) = widgets.as_ref() else {
                return;
            };

            imp.seek_syncing.set(true);
            widgets.seek_scale.set_value(player.progress_fraction());
            imp.seek_syncing.set(false);
            let (elapsed, total) = player.time_labels();
            widgets
                .time_label
                .set_text(&format!("{} / {}", elapsed, total));

            if change == Change::Progress {
                return;
            }

            let status = state.status;
            let loading = status == PlaybackStatus::Loading;
            widgets
                .play_btn
                .set_label(if status.is_playing() { "[PAUSE]" } else { "[PLAY]" });
            widgets
                .mute_btn
                .set_label(if state.is_muted { "[MUTED]" } else { "[SOUND]" });
            widgets.spinner.set_visible(loading);
            widgets.spinner.set_spinning(loading);
            widgets
                .seek_scale
                .set_sensitive(state.has_duration() && !status.is_errored());

            if status.is_errored() {
                widgets.stack.set_visible_child_name(PAGE_ERROR);
                widgets.controls.set_sensitive(false);
                self.add_css_class("errored");
            }
        }

        // A nested refresh may already have moved the status.
        if player.status() == PlaybackStatus::Ready
            && imp.autoplay.get()
            && !imp.autoplay_issued.get()
        {
            imp.autoplay_issued.set(true);
            player.toggle_play();
        }
    }
}

impl Default for ReelCard {
    fn default() -> Self {
        Self::new()
    }
}
