//! Render-ready projection of a [`Session`].
//!
//! [`project`] is recomputed after every mutation. Derived values (resolved
//! variant, per-value availability, focus order) are never cached.

use quickview_core::{Image, Money, Product};

use crate::guard::ElementId;
use crate::session::{CtaPhase, LoadState, Session};

/// Overlay container element.
pub const OVERLAY_ID: &str = "quick-view";
pub const CLOSE_BUTTON_ID: &str = "quick-view-close";
pub const CTA_BUTTON_ID: &str = "quick-view-cta";

pub const PRICE_PROMPT: &str = "Select options to see price";

/// Element id of the button for one option value.
#[must_use]
pub fn option_value_id(option_name: &str, value: &str) -> ElementId {
    ElementId(format!("quick-view-option:{option_name}:{value}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickViewState {
    pub is_open: bool,
    pub body: PanelBody,
    pub cta: CtaView,
    /// Focusable controls inside the overlay, in tab order.
    pub focus_order: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Hidden,
    Loading,
    Error { message: &'static str },
    Product(ProductView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    pub price: PriceDisplay,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceDisplay {
    Amount(Money),
    Prompt,
}

impl std::fmt::Display for PriceDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceDisplay::Amount(money) => write!(f, "{money}"),
            PriceDisplay::Prompt => f.write_str(PRICE_PROMPT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValueView {
    pub value: String,
    pub element: ElementId,
    pub selected: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtaView {
    pub phase: CtaPhase,
    pub label: &'static str,
    pub enabled: bool,
}

#[must_use]
pub fn project(session: &Session) -> QuickViewState {
    let cta = CtaView {
        phase: session.cta_phase(),
        label: session.cta_phase().label(),
        enabled: session.can_add_to_bag(),
    };

    if !session.is_open() {
        return QuickViewState {
            is_open: false,
            body: PanelBody::Hidden,
            cta,
            focus_order: Vec::new(),
        };
    }

    let body = match (session.load_state(), session.product()) {
        (LoadState::Failed(err), _) => PanelBody::Error {
            message: err.display_message(),
        },
        (LoadState::Loaded, Some(product)) => PanelBody::Product(product_view(session, product)),
        _ => PanelBody::Loading,
    };

    let mut focus_order = vec![ElementId::from(CLOSE_BUTTON_ID)];
    if let PanelBody::Product(view) = &body {
        focus_order.extend(
            view.options
                .iter()
                .flat_map(|o| o.values.iter())
                .filter(|v| v.enabled)
                .map(|v| v.element.clone()),
        );
        if cta.enabled {
            focus_order.push(ElementId::from(CTA_BUTTON_ID));
        }
    }

    QuickViewState {
        is_open: true,
        body,
        cta,
        focus_order,
    }
}

fn product_view(session: &Session, product: &Product) -> ProductView {
    let resolved = session.resolved_variant();

    let image = resolved
        .and_then(|v| v.image.as_ref())
        .or_else(|| product.fallback_image())
        .cloned();

    let price = resolved.map_or(PriceDisplay::Prompt, |v| PriceDisplay::Amount(v.price.clone()));

    let options = product
        .options
        .iter()
        .map(|option| OptionView {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| OptionValueView {
                    value: value.clone(),
                    element: option_value_id(&option.name, value),
                    selected: session.selections().get(&option.name) == Some(value.as_str()),
                    enabled: session.is_value_available(&option.name, value),
                })
                .collect(),
        })
        .collect();

    ProductView {
        title: product.title.clone(),
        description: product.description.clone(),
        image,
        price,
        options,
    }
}
