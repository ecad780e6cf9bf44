//! The type-ahead component.
//!
//! ```text
//! DomEvent::Input ──► QueryDispatcher ──► debounce TimerSlot ──► ProductSource
//!                                                                    │
//!        Navigator ◄── render (results / placeholder / error) ◄──────┘
//!            │
//!            └──► commit ──► visible + hidden field, close, focus TimerSlot
//! ```
//!
//! All state changes happen inside `handle_event` and `handle_wakeup`, which
//! run to completion. Timers and requests run as tokio tasks that only post
//! a [`Wakeup`] back to the component.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::client::{ProductSource, SearchOutcome};
use crate::config::SearchConfig;
use crate::dispatcher::{DispatchPhase, InputDecision, QueryDispatcher};
use crate::dom::{
    Anchors, Document, DomEvent, EventDisposition, EventKind, Key, ListenerId, ListenerTarget,
    MissingAnchor, NodeId,
};
use crate::models::{Product, SelectedProduct};
use crate::navigator::Navigator;
use crate::render;
use crate::timer::TimerSlot;

/// How long an error row stays open.
pub const ERROR_DISMISS_DELAY: Duration = Duration::from_millis(3000);

/// Delay before focus moves to the downstream field after a commit.
pub const FOCUS_DELAY: Duration = Duration::from_millis(100);

/// Lifecycle status of a component handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentStatus {
    /// Anchors bound, listeners attached.
    Active,
    /// One or more anchors were missing; every operation is a no-op.
    Disabled { missing: Vec<MissingAnchor> },
    /// `destroy` was called.
    Destroyed,
}

/// What the results container is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Closed,
    Results,
    Empty,
    Error,
}

/// Deferred work posted back to the component by its tasks.
#[derive(Debug)]
pub(crate) enum Wakeup {
    DebounceElapsed { generation: u64, query: String },
    SearchCompleted { sequence: u64, query: String, outcome: SearchOutcome },
    ErrorExpired { generation: u64 },
    FocusDownstream { generation: u64, target: NodeId },
}

/// A type-ahead product search bound to a document.
pub struct ProductSearch<D: Document> {
    config: Arc<SearchConfig>,
    document: D,
    source: Arc<dyn ProductSource>,
    status: ComponentStatus,
    anchors: Option<Anchors>,
    listeners: Vec<ListenerId>,

    dispatcher: QueryDispatcher,
    navigator: Navigator,
    results: Vec<Product>,
    view: View,

    debounce: TimerSlot,
    error_timer: TimerSlot,
    focus_timer: TimerSlot,
    requests: Vec<JoinHandle<()>>,

    tx: UnboundedSender<Wakeup>,
    rx: UnboundedReceiver<Wakeup>,
}

impl<D: Document> std::fmt::Debug for ProductSearch<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductSearch")
            .field("status", &self.status)
            .field("phase", &self.dispatcher.phase())
            .field("sequence", &self.dispatcher.sequence())
            .field("results", &self.results.len())
            .field("highlighted", &self.navigator.highlighted())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl<D: Document> ProductSearch<D> {
    /// Bind to `document` and attach listeners.
    ///
    /// If any anchor is missing the handle comes back with
    /// [`ComponentStatus::Disabled`], no listeners attached, and every later
    /// call a no-op. Check [`status`](Self::status) to detect misconfiguration.
    pub fn initialize(
        config: SearchConfig,
        mut document: D,
        source: Arc<dyn ProductSource>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let (status, anchors, listeners) = match Anchors::bind(&document, &config) {
            Ok(anchors) => {
                let listeners = attach_listeners(&mut document, &anchors);
                document.set_hidden(anchors.results_container, true);
                tracing::info!(
                    "Product search initialized on #{} ({} listeners)",
                    config.search_input_id,
                    listeners.len()
                );
                (ComponentStatus::Active, Some(anchors), listeners)
            }
            Err(missing) => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                tracing::warn!(
                    "Product search disabled, missing anchors: {}",
                    names.join(", ")
                );
                (ComponentStatus::Disabled { missing }, None, Vec::new())
            }
        };

        Self {
            dispatcher: QueryDispatcher::new(config.min_search_length),
            config: Arc::new(config),
            document,
            source,
            status,
            anchors,
            listeners,
            navigator: Navigator::new(),
            results: Vec::new(),
            view: View::Closed,
            debounce: TimerSlot::new(),
            error_timer: TimerSlot::new(),
            focus_timer: TimerSlot::new(),
            requests: Vec::new(),
            tx,
            rx,
        }
    }

    /// Lifecycle status.
    pub fn status(&self) -> &ComponentStatus {
        &self.status
    }

    /// Whether the component is mounted and reacting to events.
    pub fn is_active(&self) -> bool {
        self.status == ComponentStatus::Active
    }

    /// The resolved configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The bound document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the bound document, for the host to update it.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Results currently rendered, in endpoint order.
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Highlighted row, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.navigator.highlighted()
    }

    /// Whether the results container is open.
    pub fn is_open(&self) -> bool {
        self.view != View::Closed
    }

    /// Dispatcher phase.
    pub fn phase(&self) -> DispatchPhase {
        self.dispatcher.phase()
    }

    /// Sequence number of the most recently dispatched query.
    pub fn sequence(&self) -> u64 {
        self.dispatcher.sequence()
    }

    /// Whether a debounce timer is scheduled and has not fired.
    pub fn has_pending_debounce(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Apply one host event.
    ///
    /// Must be called from within a tokio runtime, since input may schedule
    /// timers.
    pub fn handle_event(&mut self, event: DomEvent) -> EventDisposition {
        let Some(anchors) = self.active_anchors() else {
            return EventDisposition::Default;
        };

        match event {
            DomEvent::Input => {
                let value = self.document.value(anchors.search_input);
                self.on_input(&value);
                EventDisposition::Default
            }
            DomEvent::KeyDown(key) => self.on_key(key),
            DomEvent::DocumentClick { target } => {
                self.on_document_click(&anchors, target);
                EventDisposition::Default
            }
            DomEvent::RowHover { index } => {
                if self.view == View::Results && self.navigator.hover(index, self.results.len()) {
                    self.paint_highlight();
                }
                EventDisposition::Default
            }
            DomEvent::RowClick { index } => {
                if self.view == View::Results
                    && let Some(product) = self.results.get(index).cloned()
                {
                    self.commit(product);
                }
                EventDisposition::Default
            }
        }
    }

    /// Wait for the next timer or response and apply it.
    ///
    /// Returns false without waiting when the component is not active.
    pub async fn process_next(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.rx.recv().await {
            Some(wakeup) => {
                self.handle_wakeup(wakeup);
                true
            }
            None => false,
        }
    }

    /// Apply every wakeup already queued, without waiting.
    pub fn process_ready(&mut self) -> usize {
        let mut applied = 0;
        while self.is_active() {
            match self.rx.try_recv() {
                Ok(wakeup) => {
                    self.handle_wakeup(wakeup);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    /// Empty both fields and the result list, and cancel pending work.
    pub fn clear(&mut self) {
        let Some(anchors) = self.active_anchors() else {
            return;
        };
        self.debounce.cancel();
        self.dispatcher.reset();
        self.document.set_value(anchors.search_input, "");
        self.document.set_value(anchors.selected_product_input, "");
        self.results.clear();
        self.document.set_inner_html(anchors.results_container, "");
        self.close();
    }

    /// The product committed into the form, read back from the fields.
    pub fn selected(&self) -> Option<SelectedProduct> {
        let anchors = self.active_anchors()?;
        let id = self.document.value(anchors.selected_product_input);
        if id.is_empty() {
            return None;
        }
        Some(SelectedProduct {
            id,
            name: self.document.value(anchors.search_input),
        })
    }

    /// Cancel every timer and request and detach all listeners.
    ///
    /// Safe to call repeatedly and on a disabled handle.
    pub fn destroy(&mut self) {
        self.debounce.cancel();
        self.error_timer.cancel();
        self.focus_timer.cancel();
        for request in self.requests.drain(..) {
            request.abort();
        }
        for listener in self.listeners.drain(..) {
            self.document.remove_listener(listener);
        }

        if self.status == ComponentStatus::Active {
            self.dispatcher.reset();
            self.status = ComponentStatus::Destroyed;
            tracing::info!("Product search destroyed");
        }
    }

    fn active_anchors(&self) -> Option<Anchors> {
        match self.status {
            ComponentStatus::Active => self.anchors,
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Dispatcher
    // ------------------------------------------------------------------

    fn on_input(&mut self, value: &str) {
        self.error_timer.cancel();
        match self.dispatcher.on_input(value) {
            InputDecision::Reject => {
                self.debounce.cancel();
                self.close();
            }
            InputDecision::Debounce(query) => {
                tracing::debug!(
                    "Debouncing query '{query}' for {:?}",
                    self.config.debounce_time
                );
                self.debounce
                    .schedule(self.config.debounce_time, &self.tx, |generation| {
                        Wakeup::DebounceElapsed { generation, query }
                    });
            }
        }
    }

    fn dispatch(&mut self, query: String) {
        let ticket = self.dispatcher.on_debounce_elapsed(query);
        tracing::debug!("Dispatching query '{}' (seq {})", ticket.query, ticket.sequence);

        self.requests.retain(|request| !request.is_finished());
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.requests.push(tokio::spawn(async move {
            let outcome = source.search(&ticket.query).await;
            let _ = tx.send(Wakeup::SearchCompleted {
                sequence: ticket.sequence,
                query: ticket.query,
                outcome,
            });
        }));
    }

    fn handle_wakeup(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::DebounceElapsed { generation, query } => {
                if self.debounce.fire(generation) {
                    self.dispatch(query);
                }
            }
            Wakeup::SearchCompleted {
                sequence,
                query,
                outcome,
            } => {
                if self.dispatcher.accepts(sequence) {
                    self.dispatcher.settle();
                    self.apply_outcome(&query, outcome);
                } else {
                    tracing::debug!(
                        "Discarding stale response for '{query}' (seq {sequence}, current {})",
                        self.dispatcher.sequence()
                    );
                }
            }
            Wakeup::ErrorExpired { generation } => {
                if self.error_timer.fire(generation) && self.view == View::Error {
                    self.close();
                }
            }
            Wakeup::FocusDownstream { generation, target } => {
                if self.focus_timer.fire(generation) {
                    self.document.focus(target);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn apply_outcome(&mut self, query: &str, outcome: SearchOutcome) {
        let Some(anchors) = self.active_anchors() else {
            return;
        };
        self.error_timer.cancel();
        self.navigator.reset();

        match outcome {
            SearchOutcome::Success(mut products) => {
                products.truncate(self.config.visible_result_count(products.len()));
                self.show_results(&anchors, products);
            }
            SearchOutcome::MalformedResponse { detail } => {
                tracing::warn!("Malformed search response for '{query}': {detail}");
                self.show_results(&anchors, Vec::new());
            }
            failure @ (SearchOutcome::ServerError { .. } | SearchOutcome::NetworkFailure(_)) => {
                tracing::error!("Product search for '{query}' failed: {failure}");
                let message = failure.failure_message().unwrap_or_default();
                self.results.clear();
                self.document.set_inner_html(
                    anchors.results_container,
                    &render::render_error(&message, &self.config.text),
                );
                self.open(View::Error);
                self.error_timer
                    .schedule(ERROR_DISMISS_DELAY, &self.tx, |generation| {
                        Wakeup::ErrorExpired { generation }
                    });
            }
        }
    }

    fn show_results(&mut self, anchors: &Anchors, products: Vec<Product>) {
        self.results = products;
        if self.results.is_empty() {
            self.document.set_inner_html(
                anchors.results_container,
                &render::render_placeholder(&self.config.text),
            );
            self.open(View::Empty);
        } else {
            let html =
                render::render_rows(&self.results, &self.config.price_format, &self.config.text);
            self.document.set_inner_html(anchors.results_container, &html);
            self.open(View::Results);
        }
    }

    fn open(&mut self, view: View) {
        if let Some(anchors) = self.active_anchors() {
            self.document.set_hidden(anchors.results_container, false);
        }
        self.view = view;
    }

    /// Close on user request. Pending and in-flight queries are dropped so
    /// the list does not reopen when they complete.
    fn dismiss(&mut self) {
        self.debounce.cancel();
        self.dispatcher.reset();
        self.close();
    }

    /// Hide the container and clear the highlight. Results stay rendered.
    fn close(&mut self) {
        self.error_timer.cancel();
        self.navigator.reset();
        self.paint_highlight();
        if let Some(anchors) = self.active_anchors() {
            self.document.set_hidden(anchors.results_container, true);
        }
        self.view = View::Closed;
    }

    /// Sync row highlight classes with the navigator.
    fn paint_highlight(&mut self) {
        let Some(anchors) = self.active_anchors() else {
            return;
        };
        let container = anchors.results_container;
        let highlighted = self.navigator.highlighted();
        for row in 0..self.results.len() {
            let on = highlighted == Some(row);
            self.document.set_row_class(container, row, render::HIGHLIGHT_CLASS, on);
        }
        if let Some(row) = highlighted {
            self.document.scroll_row_into_view(container, row);
        }
    }

    // ------------------------------------------------------------------
    // Keyboard, selection, dismissal
    // ------------------------------------------------------------------

    fn on_key(&mut self, key: Key) -> EventDisposition {
        if !key.is_navigation() {
            return EventDisposition::Default;
        }

        let len = if self.view == View::Results {
            self.results.len()
        } else {
            0
        };
        match key {
            Key::ArrowDown => {
                self.navigator.move_down(len);
                self.paint_highlight();
            }
            Key::ArrowUp => {
                self.navigator.move_up(len);
                self.paint_highlight();
            }
            Key::Enter => {
                if let Some(product) = self
                    .navigator
                    .enter_target(len)
                    .and_then(|index| self.results.get(index).cloned())
                {
                    self.commit(product);
                }
            }
            Key::Escape => self.dismiss(),
            Key::Other(_) => {}
        }
        EventDisposition::PreventDefault
    }

    fn commit(&mut self, product: Product) {
        let Some(anchors) = self.active_anchors() else {
            return;
        };
        self.debounce.cancel();
        self.dispatcher.reset();

        self.document.set_value(anchors.search_input, &product.name);
        self.document
            .set_value(anchors.selected_product_input, product.id.as_str());
        self.results.clear();
        self.close();
        self.document.set_inner_html(anchors.results_container, "");

        if let Some(target) = self.document.element_by_name(&self.config.quantity_input_name) {
            self.focus_timer.schedule(FOCUS_DELAY, &self.tx, |generation| {
                Wakeup::FocusDownstream { generation, target }
            });
        }

        tracing::info!("Product selected: '{}' (id {})", product.name, product.id);
    }

    fn on_document_click(&mut self, anchors: &Anchors, target: NodeId) {
        let inside = self.document.contains(anchors.search_input, target)
            || self.document.contains(anchors.results_container, target);
        if !inside && self.is_open() {
            tracing::debug!("Click outside product search, closing results");
            self.dismiss();
        }
    }
}

impl<D: Document> Drop for ProductSearch<D> {
    fn drop(&mut self) {
        for request in self.requests.drain(..) {
            request.abort();
        }
    }
}

fn attach_listeners<D: Document>(document: &mut D, anchors: &Anchors) -> Vec<ListenerId> {
    let input = ListenerTarget::Element(anchors.search_input);
    let container = ListenerTarget::Element(anchors.results_container);
    vec![
        document.add_listener(input, EventKind::Input),
        document.add_listener(input, EventKind::KeyDown),
        document.add_listener(container, EventKind::Click),
        document.add_listener(container, EventKind::MouseOver),
        document.add_listener(ListenerTarget::Document, EventKind::Click),
    ]
}
