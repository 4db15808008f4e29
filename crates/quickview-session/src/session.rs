//! Quick-view session state.
//!
//! [`Session`] is plain data. Every mutation goes through
//! [`QuickViewController`](crate::QuickViewController); outside the crate it
//! is read-only.

use quickview_core::{is_value_available, resolve, Product, SelectionMap, Variant};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(LoadError),
}

/// Phase of the simulated add-to-bag action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaPhase {
    Idle,
    Pending,
    Confirmed,
}

impl CtaPhase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CtaPhase::Idle => "Add to bag",
            CtaPhase::Pending => "Adding…",
            CtaPhase::Confirmed => "Added",
        }
    }
}

/// Result of [`QuickViewController::pick`](crate::QuickViewController::pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Applied,
    /// The session is closed or has no loaded product.
    NotReady,
    UnknownOption,
    /// The value is not listed for the option.
    UnknownValue,
    /// No sellable variant stays reachable with this value.
    Unavailable,
    /// The add-to-bag action is in flight; selections are frozen.
    Locked,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) is_open: bool,
    pub(crate) target: Option<String>,
    pub(crate) load_state: LoadState,
    pub(crate) product: Option<Product>,
    pub(crate) selections: SelectionMap,
    pub(crate) cta_phase: CtaPhase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            is_open: false,
            target: None,
            load_state: LoadState::Idle,
            product: None,
            selections: SelectionMap::new(),
            cta_phase: CtaPhase::Idle,
        }
    }
}

impl Session {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    #[must_use]
    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    #[must_use]
    pub fn cta_phase(&self) -> CtaPhase {
        self.cta_phase
    }

    /// The variant matching the current, complete selection.
    #[must_use]
    pub fn resolved_variant(&self) -> Option<&Variant> {
        let product = self.product.as_ref()?;
        resolve(&product.options, &product.variants, &self.selections)
    }

    /// Whether picking `value` for `option_name` keeps a sellable variant
    /// reachable. Always `false` without a loaded product.
    #[must_use]
    pub fn is_value_available(&self, option_name: &str, value: &str) -> bool {
        self.product.as_ref().is_some_and(|p| {
            is_value_available(&p.options, &p.variants, &self.selections, option_name, value)
        })
    }

    /// Add-to-bag is possible: open, idle, and a sellable variant resolved.
    #[must_use]
    pub fn can_add_to_bag(&self) -> bool {
        self.is_open
            && self.cta_phase == CtaPhase::Idle
            && self.resolved_variant().is_some_and(|v| v.available_for_sale)
    }

    /// Points the session at a new product; everything tied to the previous
    /// one is dropped.
    pub(crate) fn retarget(&mut self, handle: &str) {
        self.target = Some(handle.to_owned());
        self.load_state = LoadState::Idle;
        self.product = None;
        self.selections.clear();
        self.cta_phase = CtaPhase::Idle;
    }

    /// A product matching the target is loaded or on its way.
    pub(crate) fn has_live_load(&self) -> bool {
        matches!(self.load_state, LoadState::Loading | LoadState::Loaded)
    }

    pub(crate) fn pick(&mut self, option_name: &str, value: &str) -> PickOutcome {
        if !self.is_open {
            return PickOutcome::NotReady;
        }
        let Some(product) = self.product.as_ref() else {
            return PickOutcome::NotReady;
        };
        if self.cta_phase != CtaPhase::Idle {
            return PickOutcome::Locked;
        }
        let Some(option) = product.option(option_name) else {
            return PickOutcome::UnknownOption;
        };
        if !option.values.iter().any(|v| v == value) {
            return PickOutcome::UnknownValue;
        }
        if !self.is_value_available(option_name, value) {
            return PickOutcome::Unavailable;
        }

        self.selections.insert(option_name, value);
        PickOutcome::Applied
    }
}
