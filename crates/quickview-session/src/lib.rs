pub mod controller;
pub mod error;
pub mod grid;
pub mod guard;
pub mod headless;
pub mod loader;
pub mod session;
pub mod view;

pub use controller::{CtaTimings, EventOutcome, Key, QuickViewController, SessionEvent, SessionEvents};
pub use error::LoadError;
pub use grid::{GridTile, ProductGrid};
pub use guard::{Document, ElementId, FocusGuard, SharedDocument};
pub use headless::HeadlessDocument;
pub use loader::{HttpProductLoader, ProductLoader};
pub use session::{CtaPhase, LoadState, PickOutcome, Session};
pub use view::{project, PanelBody, PriceDisplay, QuickViewState};
