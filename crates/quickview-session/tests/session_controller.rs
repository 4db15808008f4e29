//! Session controller behaviour under paused time with a hand-driven loader.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quickview_core::{Image, Money, Product, ProductOption, SelectedOption, Variant};
use tokio::sync::oneshot;

use quickview_session::view::{option_value_id, CLOSE_BUTTON_ID, CTA_BUTTON_ID};
use quickview_session::{
    CtaPhase, CtaTimings, Document, ElementId, EventOutcome, HeadlessDocument, Key, LoadError,
    LoadState, PanelBody, PickOutcome, PriceDisplay, ProductLoader, QuickViewController,
    SessionEvents,
};

type LoadReply = oneshot::Sender<Result<Product, LoadError>>;

/// Loader whose calls stay pending until the test answers them.
#[derive(Default)]
struct ManualLoader {
    calls: AtomicUsize,
    pending: Mutex<Vec<(String, LoadReply)>>,
}

impl ManualLoader {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, handle: &str, result: Result<Product, LoadError>) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(h, _)| h == handle)
            .unwrap_or_else(|| panic!("no pending load for {handle}"));
        let (_, reply) = pending.remove(index);
        reply.send(result).expect("load task dropped");
    }
}

#[async_trait]
impl ProductLoader for ManualLoader {
    async fn load(&self, handle: &str) -> Result<Product, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((handle.to_owned(), tx));
        rx.await
            .unwrap_or_else(|_| Err(LoadError::Transport("loader dropped".to_owned())))
    }
}

fn money(amount: &str) -> Money {
    Money {
        amount: amount.to_owned(),
        currency_code: "USD".to_owned(),
    }
}

fn image(url: &str) -> Image {
    Image {
        url: url.to_owned(),
        alt_text: None,
        width: None,
        height: None,
    }
}

fn variant(id: &str, color: &str, size: &str, sellable: bool, price: &str) -> Variant {
    Variant {
        id: id.to_owned(),
        available_for_sale: sellable,
        selected_options: vec![
            SelectedOption {
                name: "Color".to_owned(),
                value: color.to_owned(),
            },
            SelectedOption {
                name: "Size".to_owned(),
                value: size.to_owned(),
            },
        ],
        image: (color == "Blue").then(|| image("https://cdn.example.com/shirt-blue.jpg")),
        price: money(price),
    }
}

/// Color [Red, Blue] × Size [S, M]; Red/M unsellable, no Blue/M.
fn shirt() -> Product {
    Product {
        id: "gid://shopify/Product/1".to_owned(),
        handle: "shirt".to_owned(),
        title: "Shirt".to_owned(),
        description: "Cotton.".to_owned(),
        media: vec![image("https://cdn.example.com/shirt-1.jpg")],
        featured_image: Some(image("https://cdn.example.com/shirt.jpg")),
        options: vec![
            ProductOption {
                name: "Color".to_owned(),
                values: vec!["Red".to_owned(), "Blue".to_owned()],
            },
            ProductOption {
                name: "Size".to_owned(),
                values: vec!["S".to_owned(), "M".to_owned()],
            },
        ],
        variants: vec![
            variant("red-s", "Red", "S", true, "29.0"),
            variant("red-m", "Red", "M", false, "29.0"),
            variant("blue-s", "Blue", "S", true, "31.0"),
        ],
    }
}

fn trousers() -> Product {
    Product {
        id: "gid://shopify/Product/2".to_owned(),
        handle: "trousers".to_owned(),
        title: "Trousers".to_owned(),
        ..shirt()
    }
}

const TRIGGER: &str = "grid-quick-view:shirt";

struct Harness {
    loader: Arc<ManualLoader>,
    document: Arc<Mutex<HeadlessDocument>>,
    controller: QuickViewController<HeadlessDocument>,
    events: SessionEvents,
}

impl Harness {
    fn new() -> Self {
        let loader = Arc::new(ManualLoader::default());
        let mut page = HeadlessDocument::new();
        page.insert(TRIGGER, None, true);
        page.focus(&ElementId::from(TRIGGER));
        let document = Arc::new(Mutex::new(page));

        let (controller, events) = QuickViewController::new(
            Arc::clone(&loader) as Arc<dyn ProductLoader>,
            Arc::clone(&document),
            CtaTimings::default(),
        );

        Self {
            loader,
            document,
            controller,
            events,
        }
    }

    fn focused(&self) -> Option<ElementId> {
        self.document.lock().unwrap().active_element()
    }

    fn scroll_locked(&self) -> bool {
        self.document.lock().unwrap().is_scroll_locked()
    }

    /// Lets spawned tasks run until they block. Paused time only advances
    /// once every task is idle.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    /// Receives the next completion and applies it.
    async fn step(&mut self) -> EventOutcome {
        let event = self.events.recv().await.expect("event channel closed");
        self.controller.apply(event)
    }

    async fn open_loaded(&mut self, handle: &str, product: Product) {
        self.controller.open(handle);
        Self::settle().await;
        self.loader.answer(handle, Ok(product));
        assert_eq!(self.step().await, EventOutcome::Applied);
    }

    async fn assert_quiet(&mut self) {
        let next = tokio::time::timeout(Duration::from_secs(10), self.events.recv()).await;
        assert!(next.is_err(), "unexpected event after cancellation");
    }
}

#[tokio::test(start_paused = true)]
async fn open_loads_product_and_activates_guard() {
    let mut h = Harness::new();

    h.controller.open("shirt");
    assert_eq!(h.controller.session().load_state(), &LoadState::Loading);
    assert_eq!(h.controller.state().body, PanelBody::Loading);
    assert!(h.scroll_locked());
    assert_eq!(h.focused(), Some(ElementId::from("quick-view")));

    Harness::settle().await;
    assert_eq!(h.loader.calls(), 1);
    h.loader.answer("shirt", Ok(shirt()));
    assert_eq!(h.step().await, EventOutcome::Applied);

    assert_eq!(h.controller.session().load_state(), &LoadState::Loaded);
    assert_eq!(h.controller.session().product().map(|p| p.title.as_str()), Some("Shirt"));
}

#[tokio::test(start_paused = true)]
async fn reopening_same_loaded_product_keeps_selection_without_reload() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    assert_eq!(h.controller.pick("Color", "Red"), PickOutcome::Applied);

    h.controller.close();
    h.controller.open("shirt");
    Harness::settle().await;

    assert_eq!(h.loader.calls(), 1);
    assert_eq!(h.controller.session().load_state(), &LoadState::Loaded);
    assert_eq!(h.controller.session().selections().get("Color"), Some("Red"));
}

#[tokio::test(start_paused = true)]
async fn opening_the_open_product_again_is_a_no_op() {
    let mut h = Harness::new();
    h.controller.open("shirt");
    Harness::settle().await;
    h.controller.open("shirt");
    Harness::settle().await;

    assert_eq!(h.loader.calls(), 1);
    assert_eq!(h.controller.session().load_state(), &LoadState::Loading);
}

#[tokio::test(start_paused = true)]
async fn retarget_resets_state_and_loads_once() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    h.controller.pick("Color", "Blue");
    h.controller.pick("Size", "S");
    assert!(h.controller.add_to_bag());

    h.controller.open("trousers");
    Harness::settle().await;

    assert_eq!(h.loader.calls(), 2);
    let session = h.controller.session();
    assert_eq!(session.target(), Some("trousers"));
    assert!(session.selections().is_empty());
    assert_eq!(session.cta_phase(), CtaPhase::Idle);
    assert!(session.product().is_none());

    h.loader.answer("trousers", Ok(trousers()));
    assert_eq!(h.step().await, EventOutcome::Applied);
    assert_eq!(h.controller.session().product().map(|p| p.title.as_str()), Some("Trousers"));
    h.assert_quiet().await;
}

#[tokio::test(start_paused = true)]
async fn load_finishing_after_close_is_discarded() {
    let mut h = Harness::new();
    h.controller.open("shirt");
    Harness::settle().await;
    h.controller.close();

    h.loader.answer("shirt", Ok(shirt()));
    assert_eq!(h.step().await, EventOutcome::Stale);

    let session = h.controller.session();
    assert!(!session.is_open());
    assert_eq!(session.load_state(), &LoadState::Idle);
    assert!(session.product().is_none());
}

#[tokio::test(start_paused = true)]
async fn load_finishing_after_retarget_is_discarded() {
    let mut h = Harness::new();
    h.controller.open("shirt");
    Harness::settle().await;
    h.controller.open("trousers");
    Harness::settle().await;

    h.loader.answer("trousers", Ok(trousers()));
    assert_eq!(h.step().await, EventOutcome::Applied);
    h.loader.answer("shirt", Ok(shirt()));
    assert_eq!(h.step().await, EventOutcome::Stale);

    assert_eq!(h.controller.session().product().map(|p| p.handle.as_str()), Some("trousers"));
}

#[tokio::test(start_paused = true)]
async fn abandoned_load_restarts_on_reopen() {
    let mut h = Harness::new();
    h.controller.open("shirt");
    Harness::settle().await;
    h.controller.close();
    h.controller.open("shirt");
    Harness::settle().await;

    assert_eq!(h.loader.calls(), 2);
    h.loader.answer("shirt", Ok(shirt()));
    assert_eq!(h.step().await, EventOutcome::Stale);
    h.loader.answer("shirt", Ok(shirt()));
    assert_eq!(h.step().await, EventOutcome::Applied);
}

#[tokio::test(start_paused = true)]
async fn failed_load_renders_message_and_stays_recoverable() {
    let mut h = Harness::new();
    h.controller.open("ghost");
    Harness::settle().await;
    h.loader.answer(
        "ghost",
        Err(LoadError::NotFound {
            handle: "ghost".to_owned(),
        }),
    );
    assert_eq!(h.step().await, EventOutcome::Applied);

    let state = h.controller.state();
    assert_eq!(
        state.body,
        PanelBody::Error {
            message: "Product not found"
        }
    );
    assert_eq!(state.focus_order, vec![ElementId::from(CLOSE_BUTTON_ID)]);
    assert_eq!(h.controller.pick("Color", "Red"), PickOutcome::NotReady);

    assert!(h.controller.handle_key(Key::Escape));
    assert!(!h.controller.session().is_open());

    h.open_loaded("ghost", shirt()).await;
    assert_eq!(h.loader.calls(), 2);
    assert!(matches!(h.controller.state().body, PanelBody::Product(_)));
}

#[tokio::test(start_paused = true)]
async fn shirt_matrix_drives_availability_price_and_image() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;

    let PanelBody::Product(view) = h.controller.state().body else {
        panic!("expected product panel");
    };
    assert_eq!(view.price, PriceDisplay::Prompt);
    assert_eq!(view.price.to_string(), "Select options to see price");
    assert_eq!(view.image.map(|i| i.url), Some("https://cdn.example.com/shirt.jpg".to_owned()));

    assert_eq!(h.controller.pick("Color", "Red"), PickOutcome::Applied);
    assert!(h.controller.session().is_value_available("Size", "S"));
    assert!(!h.controller.session().is_value_available("Size", "M"));
    assert_eq!(h.controller.pick("Size", "M"), PickOutcome::Unavailable);
    assert_eq!(h.controller.pick("Fabric", "Linen"), PickOutcome::UnknownOption);

    h.controller.pick("Color", "Blue");
    h.controller.pick("Size", "S");
    let PanelBody::Product(view) = h.controller.state().body else {
        panic!("expected product panel");
    };
    assert_eq!(view.price, PriceDisplay::Amount(money("31.0")));
    assert_eq!(
        view.image.map(|i| i.url),
        Some("https://cdn.example.com/shirt-blue.jpg".to_owned())
    );
    let size = &view.options[1];
    assert!(size.values[0].selected && size.values[0].enabled);
    assert!(!size.values[1].enabled);
}

#[tokio::test(start_paused = true)]
async fn add_to_bag_confirms_then_closes_itself() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    h.controller.pick("Color", "Red");
    h.controller.pick("Size", "S");

    assert!(h.controller.add_to_bag());
    assert_eq!(h.controller.session().cta_phase(), CtaPhase::Pending);
    assert_eq!(h.controller.state().cta.label, "Adding…");
    assert!(!h.controller.add_to_bag());
    assert_eq!(h.controller.pick("Color", "Blue"), PickOutcome::Locked);

    let started = tokio::time::Instant::now();
    assert_eq!(h.step().await, EventOutcome::Applied);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert!(started.elapsed() < Duration::from_millis(2200));
    assert_eq!(h.controller.session().cta_phase(), CtaPhase::Confirmed);
    assert_eq!(h.controller.state().cta.label, "Added");

    assert_eq!(h.step().await, EventOutcome::Applied);
    assert!(started.elapsed() >= Duration::from_millis(2200));
    assert!(!h.controller.session().is_open());
    assert_eq!(h.controller.session().cta_phase(), CtaPhase::Idle);
    assert!(!h.scroll_locked());
    assert_eq!(h.focused(), Some(ElementId::from(TRIGGER)));
}

#[tokio::test(start_paused = true)]
async fn close_while_pending_cancels_confirmation() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    h.controller.pick("Color", "Red");
    h.controller.pick("Size", "S");
    assert!(h.controller.add_to_bag());

    h.controller.close();

    h.assert_quiet().await;
    let session = h.controller.session();
    assert!(!session.is_open());
    assert_eq!(session.cta_phase(), CtaPhase::Idle);

    h.controller.open("shirt");
    assert_eq!(h.controller.session().cta_phase(), CtaPhase::Idle);
    assert_eq!(h.controller.state().cta.label, "Add to bag");
}

#[tokio::test(start_paused = true)]
async fn close_while_confirmed_cancels_auto_dismiss() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    h.controller.pick("Color", "Red");
    h.controller.pick("Size", "S");
    h.controller.add_to_bag();
    assert_eq!(h.step().await, EventOutcome::Applied);

    h.controller.close();
    h.controller.open("shirt");

    h.assert_quiet().await;
    assert!(h.controller.session().is_open());
    assert_eq!(h.controller.session().cta_phase(), CtaPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn tab_cycles_through_enabled_controls() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;

    let order = h.controller.state().focus_order;
    assert_eq!(
        order,
        vec![
            ElementId::from(CLOSE_BUTTON_ID),
            option_value_id("Color", "Red"),
            option_value_id("Color", "Blue"),
            option_value_id("Size", "S"),
        ]
    );

    assert!(h.controller.handle_key(Key::Tab));
    assert_eq!(h.focused(), Some(ElementId::from(CLOSE_BUTTON_ID)));
    assert!(h.controller.handle_key(Key::ShiftTab));
    assert_eq!(h.focused(), Some(option_value_id("Size", "S")));
    assert!(h.controller.handle_key(Key::Tab));
    assert_eq!(h.focused(), Some(ElementId::from(CLOSE_BUTTON_ID)));

    h.controller.pick("Color", "Red");
    h.controller.pick("Size", "S");
    assert_eq!(
        h.controller.state().focus_order.last(),
        Some(&ElementId::from(CTA_BUTTON_ID))
    );
    assert!(!h.controller.handle_key(Key::Other));
}

#[tokio::test(start_paused = true)]
async fn escape_releases_guard_and_restores_focus() {
    let mut h = Harness::new();
    h.open_loaded("shirt", shirt()).await;
    h.controller.handle_key(Key::Tab);

    assert!(h.controller.handle_key(Key::Escape));

    assert!(!h.scroll_locked());
    assert_eq!(h.focused(), Some(ElementId::from(TRIGGER)));
    assert!(!h.controller.handle_key(Key::Tab));
    assert!(!h.controller.handle_key(Key::Escape));
}

#[tokio::test(start_paused = true)]
async fn dropping_open_controller_releases_guard() {
    let h = Harness::new();
    let Harness {
        document,
        mut controller,
        ..
    } = h;
    controller.open("shirt");
    assert!(document.lock().unwrap().is_scroll_locked());

    drop(controller);

    let page = document.lock().unwrap();
    assert!(!page.is_scroll_locked());
    assert_eq!(page.active_element(), Some(ElementId::from(TRIGGER)));
}
