//! DOM side of the floating preview: one fixed-position container with an
//! embed iframe, owned for the whole page session. All decisions live in
//! `peeka_core::FloatingController`; this module only executes them.

use std::cell::RefCell;

use gloo::timers::callback::Timeout;
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement, Node};

use peeka_core::tuning::{SURFACE_HEIGHT_PX, SURFACE_WIDTH_PX};
use peeka_core::{embed_url, place_beside, AnchorRect, ChannelId, FloatingController, FloatingTimer, Viewport};

pub(crate) struct FloatingShell {
    pub(crate) controller: RefCell<FloatingController>,
    pub(crate) timers: RefCell<FloatingTimers>,
    container: HtmlElement,
    frame: HtmlIFrameElement,
    anchor: RefCell<Option<Element>>,
}

#[derive(Default)]
pub(crate) struct FloatingTimers {
    show: Option<Timeout>,
    hide: Option<Timeout>,
    record: Option<Timeout>,
    pip_exit: Option<Timeout>,
}

impl FloatingTimers {
    pub(crate) fn set(&mut self, timer: FloatingTimer, handle: Timeout) {
        *self.slot(timer) = Some(handle);
    }

    pub(crate) fn clear(&mut self, timer: FloatingTimer) {
        self.slot(timer).take();
    }

    fn slot(&mut self, timer: FloatingTimer) -> &mut Option<Timeout> {
        match timer {
            FloatingTimer::Show => &mut self.show,
            FloatingTimer::Hide => &mut self.hide,
            FloatingTimer::Record => &mut self.record,
            FloatingTimer::PipExit => &mut self.pip_exit,
        }
    }
}

impl FloatingShell {
    pub(crate) fn mount(document: &Document) -> Option<Self> {
        let container = document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        container.set_id("peeka-floating-preview");
        container.style().set_css_text(&format!(
            "position: fixed; \
             width: {SURFACE_WIDTH_PX}px; \
             height: {SURFACE_HEIGHT_PX}px; \
             z-index: 10000; \
             background: #18181b; \
             border: 2px solid #9147ff; \
             border-radius: 8px; \
             box-shadow: 0 8px 32px rgba(0, 0, 0, 0.6); \
             display: none; \
             overflow: hidden; \
             pointer-events: auto;"
        ));

        let frame = document
            .create_element("iframe")
            .ok()?
            .dyn_into::<HtmlIFrameElement>()
            .ok()?;
        frame
            .style()
            .set_css_text("width: 100%; height: 100%; border: none;");
        let _ = frame.set_attribute("allow", "autoplay; fullscreen; picture-in-picture");

        container.append_child(frame.as_ref()).ok()?;
        document.body()?.append_child(container.as_ref()).ok()?;

        Some(Self {
            controller: RefCell::new(FloatingController::new()),
            timers: RefCell::new(FloatingTimers::default()),
            container,
            frame,
            anchor: RefCell::new(None),
        })
    }

    pub(crate) fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub(crate) fn container_contains(&self, node: &Node) -> bool {
        self.container.contains(Some(node))
    }

    pub(crate) fn is_frame(&self, element: &Element) -> bool {
        let frame: &Element = self.frame.as_ref();
        frame.is_same_node(Some(element.as_ref()))
    }

    pub(crate) fn set_anchor(&self, element: Option<Element>) {
        *self.anchor.borrow_mut() = element;
    }

    pub(crate) fn anchor_matches(&self, element: &Element) -> bool {
        let anchor = self.anchor.borrow();
        let Some(anchor) = anchor.as_ref() else {
            return false;
        };
        element.is_same_node(Some(anchor.as_ref())) || element.contains(Some(anchor.as_ref()))
    }

    pub(crate) fn set_embed(&self, channel: &ChannelId) {
        self.frame.set_src(&embed_url(channel, Date::now() as u64));
    }

    pub(crate) fn clear_embed(&self) {
        self.frame.set_src("");
    }

    /// Position next to the current anchor, measured now, and show.
    pub(crate) fn reveal(&self) {
        let anchor = self.anchor.borrow();
        let Some(anchor) = anchor.as_ref() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(width) = window.inner_width().ok().and_then(|v| v.as_f64()) else {
            return;
        };
        let Some(height) = window.inner_height().ok().and_then(|v| v.as_f64()) else {
            return;
        };
        let rect = anchor.get_bounding_client_rect();
        let (x, y) = place_beside(
            AnchorRect {
                left: rect.left(),
                top: rect.top(),
                right: rect.right(),
                bottom: rect.bottom(),
            },
            Viewport { width, height },
        );

        let style = self.container.style();
        let _ = style.set_property("left", &format!("{x}px"));
        let _ = style.set_property("top", &format!("{y}px"));
        let _ = style.set_property("display", "block");
        let _ = style.set_property("visibility", "visible");
        let _ = style.set_property("pointer-events", "auto");
    }

    /// Invisible and click-through, but still mounted so a PIP video backed
    /// by the embed keeps playing.
    pub(crate) fn conceal(&self) {
        let style = self.container.style();
        let _ = style.set_property("visibility", "hidden");
        let _ = style.set_property("pointer-events", "none");
    }

    pub(crate) fn hide(&self) {
        let _ = self.container.style().set_property("display", "none");
        self.set_anchor(None);
    }
}
