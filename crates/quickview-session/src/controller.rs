//! The quick-view session controller.
//!
//! All state transitions happen on the caller's task through `&mut self`.
//! The only suspension points are product loads and the two add-to-bag
//! timers; both run as spawned tasks that post a [`SessionEvent`] back to the
//! owner, who feeds it to [`QuickViewController::apply`].
//!
//! Stale completions are detected by counters captured when the task starts:
//! `load_generation` for loads and `cta_epoch` for timers. Closing or
//! retargeting bumps both, and additionally aborts the pending timer task.

use std::sync::Arc;
use std::time::Duration;

use quickview_core::{AppConfig, Product};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::LoadError;
use crate::guard::{lock_document, Document, ElementId, FocusGuard, SharedDocument};
use crate::loader::ProductLoader;
use crate::session::{CtaPhase, LoadState, PickOutcome, Session};
use crate::view::{self, QuickViewState, OVERLAY_ID};

/// Delays of the simulated add-to-bag action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtaTimings {
    /// `pending → confirmed`.
    pub confirm: Duration,
    /// `confirmed → closed`.
    pub dismiss: Duration,
}

impl Default for CtaTimings {
    fn default() -> Self {
        Self {
            confirm: Duration::from_millis(1000),
            dismiss: Duration::from_millis(1200),
        }
    }
}

impl From<&AppConfig> for CtaTimings {
    fn from(config: &AppConfig) -> Self {
        Self {
            confirm: Duration::from_millis(config.cta_confirm_delay_ms),
            dismiss: Duration::from_millis(config.cta_dismiss_delay_ms),
        }
    }
}

/// Keyboard input routed to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    ShiftTab,
    Other,
}

/// Completion posted by a load or timer task.
#[derive(Debug)]
pub struct SessionEvent(EventKind);

#[derive(Debug)]
enum EventKind {
    LoadFinished {
        generation: u64,
        handle: String,
        result: Result<Product, LoadError>,
    },
    CtaTimer {
        epoch: u64,
        step: CtaStep,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtaStep {
    Confirm,
    Dismiss,
}

/// Whether [`QuickViewController::apply`] changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The event belonged to a load or timer the session has moved past.
    Stale,
}

/// Receiving end of the controller's completion channel.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    /// Waits for the next completion. Returns `None` once the controller is
    /// dropped and every task it spawned has finished.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}

pub struct QuickViewController<D: Document> {
    session: Session,
    loader: Arc<dyn ProductLoader>,
    document: SharedDocument<D>,
    timings: CtaTimings,
    events: mpsc::UnboundedSender<SessionEvent>,
    load_generation: u64,
    cta_epoch: u64,
    cta_timer: Option<JoinHandle<()>>,
    guard: Option<FocusGuard<D>>,
}

impl<D: Document> QuickViewController<D> {
    /// Creates a closed controller and the channel its tasks report on.
    ///
    /// The receiver is returned separately so the owner can await it while
    /// still holding `&mut` access to the controller.
    pub fn new(
        loader: Arc<dyn ProductLoader>,
        document: SharedDocument<D>,
        timings: CtaTimings,
    ) -> (Self, SessionEvents) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            session: Session::default(),
            loader,
            document,
            timings,
            events,
            load_generation: 0,
            cta_epoch: 0,
            cta_timer: None,
            guard: None,
        };
        (controller, SessionEvents { rx })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn state(&self) -> QuickViewState {
        view::project(&self.session)
    }

    /// Opens the overlay on the product with `handle`.
    ///
    /// Opening the handle that is already open does nothing. Reopening the
    /// previous handle after a close keeps its loaded product and selections;
    /// it only reloads if the earlier load was abandoned or failed. Any other
    /// handle resets selections and the add-to-bag phase and starts a fresh
    /// load.
    pub fn open(&mut self, handle: &str) {
        let same_target = self.session.target() == Some(handle);
        if self.session.is_open && same_target {
            tracing::debug!(handle, "quick view already open on this product");
            return;
        }

        self.cancel_cta();
        if !same_target {
            self.load_generation += 1;
            self.session.retarget(handle);
        }

        let was_open = self.session.is_open;
        self.session.is_open = true;
        tracing::info!(handle, retarget = !same_target, "quick view opened");

        if !self.session.has_live_load() {
            self.start_load();
        }

        self.render();
        if !was_open {
            self.guard = Some(FocusGuard::activate(
                Arc::clone(&self.document),
                ElementId::from(OVERLAY_ID),
            ));
        }
    }

    /// Closes the overlay. Abandons an in-flight load, cancels add-to-bag
    /// timers and releases the focus guard before returning.
    pub fn close(&mut self) {
        if !self.session.is_open {
            return;
        }

        self.session.is_open = false;
        if self.session.load_state == LoadState::Loading {
            self.load_generation += 1;
            self.session.load_state = LoadState::Idle;
        }
        self.cancel_cta();
        self.guard = None;
        self.render();

        tracing::info!(handle = ?self.session.target(), "quick view closed");
    }

    /// Selects `value` for `option_name` on the loaded product.
    pub fn pick(&mut self, option_name: &str, value: &str) -> PickOutcome {
        let outcome = self.session.pick(option_name, value);
        if outcome == PickOutcome::Applied {
            self.render();
        } else {
            tracing::debug!(option_name, value, ?outcome, "pick rejected");
        }
        outcome
    }

    /// Starts the simulated add-to-bag action. Returns `false` (and changes
    /// nothing) unless a sellable variant is resolved and the action is idle.
    pub fn add_to_bag(&mut self) -> bool {
        if !self.session.can_add_to_bag() {
            tracing::debug!(phase = ?self.session.cta_phase, "add to bag ignored");
            return false;
        }

        let variant_id = self.session.resolved_variant().map(|v| v.id.clone());
        tracing::info!(variant = ?variant_id, "adding variant to bag");

        self.session.cta_phase = CtaPhase::Pending;
        self.schedule(CtaStep::Confirm, self.timings.confirm);
        self.render();
        true
    }

    /// Handles a key press while the overlay is mounted. Returns `true` when
    /// the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.session.is_open => {
                self.close();
                true
            }
            Key::Tab | Key::ShiftTab => self
                .guard
                .as_ref()
                .and_then(|guard| guard.handle_tab(key == Key::ShiftTab))
                .is_some(),
            _ => false,
        }
    }

    /// Applies a completion received from [`SessionEvents`].
    pub fn apply(&mut self, event: SessionEvent) -> EventOutcome {
        match event.0 {
            EventKind::LoadFinished {
                generation,
                handle,
                result,
            } => self.finish_load(generation, &handle, result),
            EventKind::CtaTimer { epoch, step } => self.advance_cta(epoch, step),
        }
    }

    fn start_load(&mut self) {
        let Some(handle) = self.session.target.clone() else {
            return;
        };

        self.load_generation += 1;
        let generation = self.load_generation;
        self.session.load_state = LoadState::Loading;
        self.session.product = None;

        tracing::debug!(handle = %handle, generation, "starting product load");

        let loader = Arc::clone(&self.loader);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = loader.load(&handle).await;
            let event = SessionEvent(EventKind::LoadFinished {
                generation,
                handle,
                result,
            });
            if events.send(event).is_err() {
                tracing::debug!(generation, "controller gone before load finished");
            }
        });
    }

    fn finish_load(
        &mut self,
        generation: u64,
        handle: &str,
        result: Result<Product, LoadError>,
    ) -> EventOutcome {
        let current = generation == self.load_generation
            && self.session.is_open
            && self.session.target() == Some(handle)
            && self.session.load_state == LoadState::Loading;
        if !current {
            tracing::debug!(handle, generation, "discarding stale product load");
            return EventOutcome::Stale;
        }

        match result {
            Ok(product) => {
                tracing::info!(
                    handle,
                    options = product.options.len(),
                    variants = product.variants.len(),
                    "product loaded"
                );
                self.session.product = Some(product);
                self.session.load_state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!(handle, error = %err, "product load failed");
                self.session.load_state = LoadState::Failed(err);
            }
        }

        self.render();
        EventOutcome::Applied
    }

    fn advance_cta(&mut self, epoch: u64, step: CtaStep) -> EventOutcome {
        if epoch != self.cta_epoch {
            tracing::debug!(epoch, current = self.cta_epoch, "discarding stale add-to-bag timer");
            return EventOutcome::Stale;
        }
        self.cta_timer = None;

        match (step, self.session.cta_phase) {
            (CtaStep::Confirm, CtaPhase::Pending) if self.session.is_open => {
                self.session.cta_phase = CtaPhase::Confirmed;
                self.schedule(CtaStep::Dismiss, self.timings.dismiss);
                self.render();
                EventOutcome::Applied
            }
            (CtaStep::Dismiss, CtaPhase::Confirmed) => {
                self.close();
                EventOutcome::Applied
            }
            _ => EventOutcome::Stale,
        }
    }

    fn schedule(&mut self, step: CtaStep, delay: Duration) {
        let epoch = self.cta_epoch;
        let events = self.events.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the controller was dropped.
            let _ = events.send(SessionEvent(EventKind::CtaTimer { epoch, step }));
        });

        if let Some(previous) = self.cta_timer.replace(timer) {
            previous.abort();
        }
    }

    /// Aborts the pending timer, invalidates any already-fired one and
    /// returns the add-to-bag action to idle.
    fn cancel_cta(&mut self) {
        if let Some(timer) = self.cta_timer.take() {
            timer.abort();
        }
        self.cta_epoch += 1;
        self.session.cta_phase = CtaPhase::Idle;
    }

    fn render(&self) {
        let focusable = view::project(&self.session).focus_order;
        lock_document(&self.document).render(&ElementId::from(OVERLAY_ID), &focusable);
    }
}

impl<D: Document> Drop for QuickViewController<D> {
    fn drop(&mut self) {
        if let Some(timer) = self.cta_timer.take() {
            timer.abort();
        }
        if self.session.is_open {
            tracing::debug!(handle = ?self.session.target(), "quick view dropped while open");
        }
    }
}
