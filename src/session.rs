//! The preview session: one explicitly constructed object owning both
//! preview slots, the PIP bridge state, and the recorder, wired to the
//! page's event stream. Lives until navigation; there is no teardown.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, Node, Window};

use peeka_core::{
    FloatingDirective, FloatingPhase, GridDirective, GridTimer, PipSurface, PipWatch,
};

use crate::floating::FloatingShell;
use crate::grid::GridShell;
use crate::history::Recorder;
use crate::hover_target::{self, HoverTarget, SIDEBAR_SELECTORS};
use crate::playback;

fn capture_options() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: true,
    }
}

pub(crate) struct PreviewSession {
    pub(crate) floating: FloatingShell,
    pub(crate) grid: GridShell,
    pub(crate) pip: RefCell<PipWatch>,
    pub(crate) recorder: Recorder,
    listeners: RefCell<Vec<EventListener>>,
}

impl PreviewSession {
    pub(crate) fn install(document: &Document, window: &Window) -> Option<Rc<Self>> {
        let floating = FloatingShell::mount(document)?;
        let session = Rc::new(Self {
            floating,
            grid: GridShell::new(),
            pip: RefCell::new(PipWatch::new()),
            recorder: Recorder::new(),
            listeners: RefCell::new(Vec::new()),
        });
        session.attach(document, window);
        Some(session)
    }

    fn attach(self: &Rc<Self>, document: &Document, window: &Window) {
        let mut listeners = Vec::new();

        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                document,
                "mouseenter",
                capture_options(),
                move |event| session.on_hover_enter(event),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                document,
                "mouseleave",
                capture_options(),
                move |event| session.on_hover_leave(event),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new(document, "keydown", move |event| {
                session.on_keydown(event)
            }));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                window,
                "scroll",
                capture_options(),
                move |_event| session.on_scroll(),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                document,
                "click",
                capture_options(),
                move |event| session.on_click(event),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new(
                document,
                "enterpictureinpicture",
                move |event| session.on_pip_enter(event),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new(
                document,
                "leavepictureinpicture",
                move |_event| session.on_pip_leave(),
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new(
                self.floating.container(),
                "mouseenter",
                move |_event| {
                    let out = session.floating.controller.borrow_mut().surface_enter();
                    session.apply_floating(out);
                },
            ));
        }
        {
            let session = Rc::clone(self);
            listeners.push(EventListener::new(
                self.floating.container(),
                "mouseleave",
                move |_event| {
                    let out = session.floating.controller.borrow_mut().surface_leave();
                    session.apply_floating(out);
                },
            ));
        }
        listeners.push(playback::watch(self, document));

        self.listeners.borrow_mut().extend(listeners);
    }

    fn pip_active(&self) -> bool {
        self.pip.borrow().floating_active(Date::now())
    }

    fn on_hover_enter(self: &Rc<Self>, event: &Event) {
        let Some(target) = event.target() else {
            return;
        };
        match hover_target::resolve(&target) {
            Some(HoverTarget::Sidebar { channel, element }) => {
                self.floating.set_anchor(Some(element));
                let out = self.floating.controller.borrow_mut().hover_enter(channel);
                self.apply_floating(out);
            }
            Some(HoverTarget::Grid { channel, card }) => {
                let out = self.grid.enter(&card, channel);
                self.apply_grid(&card, out);
            }
            None => {}
        }
    }

    fn on_hover_leave(self: &Rc<Self>, event: &Event) {
        let Some(element) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        else {
            return;
        };
        if let Ok(Some(sidebar)) = element.closest(SIDEBAR_SELECTORS) {
            if self.floating.anchor_matches(&sidebar) {
                let out = self.floating.controller.borrow_mut().hover_leave();
                self.apply_floating(out);
            }
            return;
        }
        if let Ok(Some(card)) = element.closest(hover_target::GRID_SELECTORS) {
            let out = self.grid.leave(&card);
            self.apply_grid(&card, out);
            self.grid.prune(&card);
        }
    }

    fn on_keydown(self: &Rc<Self>, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if event.key() != "Escape" {
            return;
        }
        let pip_active = self.pip_active();
        let out = self.floating.controller.borrow_mut().escape(pip_active);
        self.apply_floating(out);
        self.grid_sweep();
    }

    fn on_scroll(self: &Rc<Self>) {
        let pip_active = self.pip_active();
        let out = self.floating.controller.borrow_mut().scroll(pip_active);
        self.apply_floating(out);
    }

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some(node) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return;
        };
        if self.floating.container_contains(&node) {
            // The player UI may be about to request PIP; keep the surface
            // alive until the native signal settles it either way.
            self.pip.borrow_mut().note_click(Date::now());
            gloo::console::log!("floating preview: click, pip possible");
        }
    }

    fn on_pip_enter(self: &Rc<Self>, event: &Event) {
        let Some(video) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        else {
            return;
        };
        // Unresolvable references are ignored rather than guessed at.
        let Ok(Some(frame)) = video.closest("iframe") else {
            return;
        };
        let revealed = matches!(
            self.floating.controller.borrow().phase(),
            FloatingPhase::Visible { .. }
        );
        let surface = if self.floating.is_frame(&frame) || revealed {
            PipSurface::Floating
        } else {
            PipSurface::Inline
        };
        self.pip.borrow_mut().note_entered(surface);
        gloo::console::log!("pip: entered");
        if surface == PipSurface::Floating {
            let out = self.floating.controller.borrow_mut().pip_entered();
            self.apply_floating(out);
        }
    }

    fn on_pip_leave(self: &Rc<Self>) {
        let was = self.pip.borrow_mut().note_left();
        let suspended = matches!(
            self.floating.controller.borrow().phase(),
            FloatingPhase::PipSuspended { .. }
        );
        gloo::console::log!("pip: left");
        if was == Some(PipSurface::Floating) || suspended {
            let out = self.floating.controller.borrow_mut().pip_left();
            self.apply_floating(out);
        }
    }

    pub(crate) fn apply_floating(self: &Rc<Self>, directives: Vec<FloatingDirective>) {
        for directive in directives {
            match directive {
                FloatingDirective::Schedule {
                    timer,
                    token,
                    delay_ms,
                } => {
                    let session = Rc::clone(self);
                    let handle = Timeout::new(delay_ms, move || {
                        session.floating.timers.borrow_mut().clear(timer);
                        let pip_active = session.pip_active();
                        let out = session
                            .floating
                            .controller
                            .borrow_mut()
                            .timer_fired(timer, token, pip_active);
                        session.apply_floating(out);
                    });
                    self.floating.timers.borrow_mut().set(timer, handle);
                }
                FloatingDirective::Cancel { timer } => {
                    self.floating.timers.borrow_mut().clear(timer);
                }
                FloatingDirective::SetEmbed { channel } => self.floating.set_embed(&channel),
                FloatingDirective::ClearEmbed => self.floating.clear_embed(),
                FloatingDirective::Reveal => self.floating.reveal(),
                FloatingDirective::Conceal => self.floating.conceal(),
                FloatingDirective::Hide => self.floating.hide(),
                FloatingDirective::RecordView { channel } => self.recorder.record(channel),
            }
        }
    }

    pub(crate) fn apply_grid(self: &Rc<Self>, card: &Element, directives: Vec<GridDirective>) {
        for directive in directives {
            match directive {
                GridDirective::Schedule {
                    timer,
                    token,
                    delay_ms,
                } => {
                    let session = Rc::clone(self);
                    let card_for_cb = card.clone();
                    let handle = Timeout::new(delay_ms, move || {
                        session.grid_timer_fired(&card_for_cb, timer, token);
                    });
                    self.grid.set_timer(card, timer, handle);
                }
                GridDirective::Cancel { timer } => self.grid.clear_timer(card, timer),
                GridDirective::Mount { channel } => {
                    if let Some(frame) = self.grid.mount(card, &channel) {
                        let session = Rc::clone(self);
                        let card_for_cb = card.clone();
                        let listener = EventListener::new(&frame, "load", move |_event| {
                            session.grid_loaded(&card_for_cb);
                        });
                        self.grid.store_load_listener(card, listener);
                        gloo::console::log!("grid preview: mounted", channel.as_str());
                    }
                }
                GridDirective::CrossFade => self.grid.cross_fade(card),
                GridDirective::ReloadEmbed => self.grid.reload(card),
                GridDirective::ScheduleRecord { channel, delay_ms } => {
                    // Deliberately detached: the record outlives even a
                    // restore of the slot.
                    let session = Rc::clone(self);
                    Timeout::new(delay_ms, move || {
                        session.recorder.record(channel);
                    })
                    .forget();
                }
                GridDirective::Restore => self.grid.restore_card(card),
            }
        }
    }

    fn grid_timer_fired(self: &Rc<Self>, card: &Element, timer: GridTimer, token: u64) {
        self.grid.clear_timer(card, timer);
        let out = self.grid.timer_fired(card, timer, token);
        self.apply_grid(card, out);
    }

    fn grid_loaded(self: &Rc<Self>, card: &Element) {
        let out = self.grid.loaded(card);
        self.apply_grid(card, out);
    }

    /// Escape sweep: restore every card with an active inline surface,
    /// regardless of hover state.
    fn grid_sweep(self: &Rc<Self>) {
        for card in self.grid.active_cards() {
            let out = self.grid.restore_directives(&card);
            self.apply_grid(&card, out);
        }
    }
}
