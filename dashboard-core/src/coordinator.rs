//! Last-issued-wins delivery of rendered pages.
//!
//! Every request mints a fresh [`RequestToken`]. Planning runs concurrently, but
//! a finished descriptor is only delivered if its token is still the current
//! one; older results are dropped. Minting and the compare-and-deliver step
//! happen under the same lock, so once a newer request has been issued an
//! older result can never reach the receiver.

use parking_lot::Mutex;
use serde::Serialize;
use std::{fmt, sync::Arc};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    model::{PageKind, RenderDescriptor},
    planner::PageRenderPlanner,
};

/// Monotonically increasing request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A descriptor that won the staleness check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub token: RequestToken,
    pub city: String,
    pub descriptor: RenderDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// A newer request was issued while this one was in flight.
    StaleResultDiscarded,
    /// Nobody is listening any more.
    ReceiverClosed,
}

#[derive(Debug)]
struct State {
    current: RequestToken,
    active_page: PageKind,
    last_city: String,
}

#[derive(Debug, Clone)]
pub struct RequestCoordinator {
    planner: Arc<PageRenderPlanner>,
    state: Arc<Mutex<State>>,
    deliveries: mpsc::UnboundedSender<Delivery>,
}

impl RequestCoordinator {
    /// Returns the coordinator and the receiving end the front end listens on.
    pub fn new(
        planner: PageRenderPlanner,
        default_city: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            planner: Arc::new(planner),
            state: Arc::new(Mutex::new(State {
                current: RequestToken(0),
                active_page: PageKind::Today,
                last_city: default_city.into(),
            })),
            deliveries: tx,
        };

        (coordinator, rx)
    }

    pub fn active_page(&self) -> PageKind {
        self.state.lock().active_page
    }

    pub fn active_city(&self) -> String {
        self.state.lock().last_city.clone()
    }

    /// Initial render: the active page for the default city.
    pub fn start(&self) -> JoinHandle<DeliveryOutcome> {
        let (page, city) = {
            let state = self.state.lock();
            (state.active_page, state.last_city.clone())
        };
        self.request_render(page, city)
    }

    /// Switch pages, keeping the last searched city.
    pub fn navigate(&self, page: PageKind) -> JoinHandle<DeliveryOutcome> {
        let city = {
            let mut state = self.state.lock();
            state.active_page = page;
            state.last_city.clone()
        };
        self.request_render(page, city)
    }

    /// Search a city on the active page. Blank input is ignored.
    pub fn search(&self, city: &str) -> Option<JoinHandle<DeliveryOutcome>> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        let page = {
            let mut state = self.state.lock();
            state.last_city = city.to_string();
            state.active_page
        };
        Some(self.request_render(page, city.to_string()))
    }

    /// Plan `page` for `city` in the background and deliver it if it is still
    /// the latest request when planning finishes. Must be called within a tokio runtime.
    pub fn request_render(
        &self,
        page: PageKind,
        city: impl Into<String>,
    ) -> JoinHandle<DeliveryOutcome> {
        let city = city.into();
        let token = {
            let mut state = self.state.lock();
            state.current = RequestToken(state.current.0 + 1);
            state.current
        };
        debug!(%token, %page, city = %city, "render requested");

        let planner = Arc::clone(&self.planner);
        let state = Arc::clone(&self.state);
        let deliveries = self.deliveries.clone();

        tokio::spawn(async move {
            let descriptor = planner.plan(page, &city).await;

            let guard = state.lock();
            if guard.current != token {
                debug!(%token, current = %guard.current, "discarding stale result");
                return DeliveryOutcome::StaleResultDiscarded;
            }

            match deliveries.send(Delivery { token, city, descriptor }) {
                Ok(()) => DeliveryOutcome::Delivered,
                Err(_) => DeliveryOutcome::ReceiverClosed,
            }
        })
    }
}
