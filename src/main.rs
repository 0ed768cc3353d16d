mod block_rules;
mod floating;
mod grid;
mod history;
mod hover_target;
mod playback;
mod session;
mod store;

use std::cell::RefCell;
use std::rc::Rc;

use session::PreviewSession;

thread_local! {
    static SESSION: RefCell<Option<Rc<PreviewSession>>> = RefCell::new(None);
}

fn main() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    block_rules::register();

    let Some(session) = PreviewSession::install(&document, &window) else {
        gloo::console::warn!("peeka: no document body, previews disabled");
        return;
    };
    playback::scan_after_startup(&session);
    gloo::console::log!("peeka: ready");

    SESSION.with(|slot| {
        *slot.borrow_mut() = Some(session);
    });
}
