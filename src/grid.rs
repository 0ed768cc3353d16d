//! DOM side of the inline grid previews.
//!
//! One `CardSlot` per card with a pending or active preview, keyed by the
//! card node. The authoritative "already active" check is the marker
//! attribute on the surface node itself, so a card can never grow a second
//! surface even if bookkeeping and DOM disagree. Every style mutation goes
//! through a reversible `VisualPatch`, which is what makes `restore`
//! idempotent.

use std::cell::RefCell;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, HtmlIFrameElement};

use peeka_core::tuning::CROSS_FADE_MS;
use peeka_core::{embed_url, rebust, ChannelId, GridDirective, GridPhase, GridSlot, GridTimer, PatchSurface, VisualPatch};

pub(crate) const SURFACE_MARKER: &str = "data-peeka-surface";
const SURFACE_MARKER_SELECTOR: &str = "iframe[data-peeka-surface=\"active\"]";

const LOADING_TEXT: &str = "Loading preview...";

/// `PatchSurface` over a real inline-style declaration.
pub(crate) struct ElementStyles {
    style: CssStyleDeclaration,
}

impl ElementStyles {
    pub(crate) fn new(element: &HtmlElement) -> Self {
        Self {
            style: element.style(),
        }
    }
}

impl PatchSurface for ElementStyles {
    fn read(&self, prop: &str) -> String {
        self.style.get_property_value(prop).unwrap_or_default()
    }

    fn write(&mut self, prop: &str, value: &str) {
        if value.is_empty() {
            let _ = self.style.remove_property(prop);
        } else {
            let _ = self.style.set_property(prop, value);
        }
    }
}

struct CardSlot {
    card: Element,
    slot: GridSlot,
    container: Option<HtmlElement>,
    container_patch: Option<VisualPatch>,
    child_patches: Vec<(HtmlElement, VisualPatch)>,
    overlay: Option<HtmlElement>,
    frame: Option<HtmlIFrameElement>,
    show_timer: Option<Timeout>,
    reload_timer: Option<Timeout>,
    load_listener: Option<EventListener>,
}

impl CardSlot {
    fn new(card: Element, channel: ChannelId) -> Self {
        Self {
            card,
            slot: GridSlot::new(channel),
            container: None,
            container_patch: None,
            child_patches: Vec::new(),
            overlay: None,
            frame: None,
            show_timer: None,
            reload_timer: None,
            load_listener: None,
        }
    }
}

#[derive(Default)]
pub(crate) struct GridShell {
    slots: RefCell<Vec<CardSlot>>,
}

impl GridShell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn card_active(card: &Element) -> bool {
        matches!(card.query_selector(SURFACE_MARKER_SELECTOR), Ok(Some(_)))
    }

    pub(crate) fn enter(&self, card: &Element, channel: ChannelId) -> Vec<GridDirective> {
        let mut slots = self.slots.borrow_mut();
        let index = match self.position(&slots, card) {
            Some(index) => index,
            None if Self::card_active(card) => return Vec::new(),
            None => {
                slots.push(CardSlot::new(card.clone(), channel));
                slots.len() - 1
            }
        };
        slots[index].slot.hover_enter()
    }

    pub(crate) fn leave(&self, card: &Element) -> Vec<GridDirective> {
        let mut slots = self.slots.borrow_mut();
        match self.position(&slots, card) {
            Some(index) => slots[index].slot.hover_leave(),
            None => Vec::new(),
        }
    }

    pub(crate) fn timer_fired(
        &self,
        card: &Element,
        timer: GridTimer,
        token: u64,
    ) -> Vec<GridDirective> {
        let mut slots = self.slots.borrow_mut();
        match self.position(&slots, card) {
            Some(index) => slots[index].slot.timer_fired(timer, token),
            None => Vec::new(),
        }
    }

    pub(crate) fn loaded(&self, card: &Element) -> Vec<GridDirective> {
        let mut slots = self.slots.borrow_mut();
        match self.position(&slots, card) {
            Some(index) => slots[index].slot.surface_loaded(),
            None => Vec::new(),
        }
    }

    pub(crate) fn restore_directives(&self, card: &Element) -> Vec<GridDirective> {
        let mut slots = self.slots.borrow_mut();
        match self.position(&slots, card) {
            Some(index) => slots[index].slot.restore(),
            None => Vec::new(),
        }
    }

    pub(crate) fn active_cards(&self) -> Vec<Element> {
        self.slots
            .borrow()
            .iter()
            .filter(|slot| slot.slot.phase() == GridPhase::Active)
            .map(|slot| slot.card.clone())
            .collect()
    }

    pub(crate) fn set_timer(&self, card: &Element, timer: GridTimer, handle: Timeout) {
        let mut slots = self.slots.borrow_mut();
        if let Some(index) = self.position(&slots, card) {
            match timer {
                GridTimer::Show => slots[index].show_timer = Some(handle),
                GridTimer::Reload => slots[index].reload_timer = Some(handle),
            }
        }
    }

    pub(crate) fn clear_timer(&self, card: &Element, timer: GridTimer) {
        let mut slots = self.slots.borrow_mut();
        if let Some(index) = self.position(&slots, card) {
            match timer {
                GridTimer::Show => slots[index].show_timer = None,
                GridTimer::Reload => slots[index].reload_timer = None,
            }
        }
    }

    /// Build the overlay and embed surface inside the card. Returns the
    /// created frame so the caller can watch its load event; `None` means
    /// the card has no usable image container and the slot was abandoned.
    pub(crate) fn mount(&self, card: &Element, channel: &ChannelId) -> Option<HtmlIFrameElement> {
        let Some(container) = find_image_container(card) else {
            gloo::console::log!("grid preview: card has no image container");
            self.drop_slot(card);
            return None;
        };
        let rect = container.get_bounding_client_rect();
        // Build both nodes before touching the card, so a failed creation
        // leaves it untouched.
        let Some((overlay, frame)) = build_surface(channel, rect.height()) else {
            self.drop_slot(card);
            return None;
        };

        let mut styles = ElementStyles::new(&container);
        let container_patch = VisualPatch::apply(
            &mut styles,
            &[
                ("width", format!("{}px", rect.width())),
                ("height", format!("{}px", rect.height())),
                ("position", "relative".to_string()),
                ("overflow", "hidden".to_string()),
                ("display", "block".to_string()),
            ],
        );

        let mut child_patches = Vec::new();
        let children = container.children();
        for i in 0..children.length() {
            let Some(child) = children
                .item(i)
                .and_then(|c| c.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let mut child_styles = ElementStyles::new(&child);
            let patch = VisualPatch::apply(&mut child_styles, &[("display", "none".to_string())]);
            child_patches.push((child, patch));
        }

        let _ = container.append_child(overlay.as_ref());
        let _ = container.append_child(frame.as_ref());

        let mut slots = self.slots.borrow_mut();
        let index = self.position(&slots, card)?;
        let state = &mut slots[index];
        state.container = Some(container);
        state.container_patch = Some(container_patch);
        state.child_patches = child_patches;
        state.overlay = Some(overlay);
        state.frame = Some(frame.clone());
        Some(frame)
    }

    pub(crate) fn store_load_listener(&self, card: &Element, listener: EventListener) {
        let mut slots = self.slots.borrow_mut();
        if let Some(index) = self.position(&slots, card) {
            slots[index].load_listener = Some(listener);
        }
    }

    pub(crate) fn cross_fade(&self, card: &Element) {
        let slots = self.slots.borrow();
        let Some(index) = self.position(&slots, card) else {
            return;
        };
        let state = &slots[index];
        if let Some(frame) = state.frame.as_ref() {
            let _ = frame.style().set_property("opacity", "1");
        }
        let Some(overlay) = state.overlay.clone() else {
            return;
        };
        let _ = overlay.style().set_property("opacity", "0");
        Timeout::new(CROSS_FADE_MS, move || {
            if overlay.parent_element().is_some() {
                overlay.remove();
            }
        })
        .forget();
    }

    pub(crate) fn reload(&self, card: &Element) {
        let slots = self.slots.borrow();
        let Some(index) = self.position(&slots, card) else {
            return;
        };
        let Some(frame) = slots[index].frame.as_ref() else {
            return;
        };
        if frame.parent_element().is_none() {
            return;
        }
        frame.set_src(&rebust(&frame.src(), Date::now() as u64));
    }

    /// Tear the surface down and put the card back as it was. Safe to call
    /// on an already-restored card.
    pub(crate) fn restore_card(&self, card: &Element) {
        let mut slots = self.slots.borrow_mut();
        let Some(index) = self.position(&slots, card) else {
            return;
        };
        let mut state = slots.remove(index);
        drop(slots);

        state.show_timer.take();
        state.reload_timer.take();
        state.load_listener.take();
        if let Some(frame) = state.frame.take() {
            frame.remove();
        }
        if let Some(overlay) = state.overlay.take() {
            overlay.remove();
        }
        for (child, patch) in state.child_patches.drain(..) {
            patch.revert(&mut ElementStyles::new(&child));
        }
        if let (Some(container), Some(patch)) = (state.container.take(), state.container_patch.take())
        {
            patch.revert(&mut ElementStyles::new(&container));
        }
    }

    /// Drop a slot that never mounted anything.
    pub(crate) fn prune(&self, card: &Element) {
        let mut slots = self.slots.borrow_mut();
        if let Some(index) = self.position(&slots, card) {
            if slots[index].slot.phase() == GridPhase::Idle && slots[index].frame.is_none() {
                slots.remove(index);
            }
        }
    }

    fn drop_slot(&self, card: &Element) {
        let mut slots = self.slots.borrow_mut();
        if let Some(index) = self.position(&slots, card) {
            slots.remove(index);
        }
    }

    fn position(&self, slots: &[CardSlot], card: &Element) -> Option<usize> {
        slots
            .iter()
            .position(|slot| slot.card.is_same_node(Some(card.as_ref())))
    }
}

fn build_surface(
    channel: &ChannelId,
    container_height: f64,
) -> Option<(HtmlElement, HtmlIFrameElement)> {
    let document = web_sys::window().and_then(|w| w.document())?;

    let overlay = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    overlay.style().set_css_text(
        "position: absolute; \
         inset: 0; \
         background: #18181b; \
         display: flex; \
         align-items: center; \
         justify-content: center; \
         z-index: 99; \
         pointer-events: none; \
         opacity: 1; \
         transition: opacity 0.3s ease; \
         color: #fff; \
         font-size: 14px; \
         font-weight: 600;",
    );
    overlay.set_text_content(Some(LOADING_TEXT));

    let frame = document
        .create_element("iframe")
        .ok()?
        .dyn_into::<HtmlIFrameElement>()
        .ok()?;
    frame.style().set_css_text(&format!(
        "width: 100%; \
         height: 100%; \
         min-height: {container_height}px; \
         border: none; \
         position: absolute; \
         top: 0; \
         left: 0; \
         z-index: 100; \
         pointer-events: auto; \
         opacity: 0; \
         transition: opacity 0.3s ease;"
    ));
    let _ = frame.set_attribute("allow", "autoplay; fullscreen; picture-in-picture");
    let _ = frame.set_attribute(SURFACE_MARKER, "active");
    frame.set_src(&embed_url(channel, Date::now() as u64));

    Some((overlay, frame))
}

fn find_image_container(card: &Element) -> Option<HtmlElement> {
    if let Ok(Some(img)) = card.query_selector("img") {
        if let Some(parent) = img.parent_element() {
            if let Ok(parent) = parent.dyn_into::<HtmlElement>() {
                return Some(parent);
            }
        }
    }
    if let Ok(Some(element)) = card.query_selector("[class*=\"image\"]") {
        if let Ok(element) = element.dyn_into::<HtmlElement>() {
            return Some(element);
        }
    }
    card.query_selector("a")
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}
