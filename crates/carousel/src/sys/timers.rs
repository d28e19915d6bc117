use crate::gui::app::AppMsg;
use prism::{Scheduler, TimerId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Runs carousel timers on the glib main loop and reports them back as [`AppMsg::Timer`].
pub struct GlibScheduler {
    sender: relm4::Sender<AppMsg>,
    sources: Rc<RefCell<HashMap<TimerId, glib::SourceId>>>,
    next_id: u64,
}

impl GlibScheduler {
    pub fn new(sender: relm4::Sender<AppMsg>) -> Self {
        Self {
            sender,
            sources: Rc::default(),
            next_id: 0,
        }
    }
}

impl Scheduler for GlibScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId::from(self.next_id);

        let sources = self.sources.clone();
        let sender = self.sender.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            // the source is gone once this runs, it must not be removed again
            sources.borrow_mut().remove(&id);
            sender.emit(AppMsg::Timer(id));
        });

        self.sources.borrow_mut().insert(id, source);
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(source) = self.sources.borrow_mut().remove(&timer) {
            source.remove();
        }
    }
}
