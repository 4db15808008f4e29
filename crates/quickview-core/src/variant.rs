//! Variant matrix resolution.
//!
//! Both functions are pure and cheap (`O(variants × options)`), so callers
//! recompute them on every selection change instead of caching.

use crate::catalog::{ProductOption, Variant};
use crate::selection::SelectionMap;

/// Resolves the variant matching a *complete* selection.
///
/// Returns `None` while any option in `options` is still unselected, even if
/// the partial selection already narrows the matrix to a single variant.
/// Also returns `None` when a complete selection matches no variant (the
/// option schema and the variant list disagree).
#[must_use]
pub fn resolve<'a>(
    options: &[ProductOption],
    variants: &'a [Variant],
    selections: &SelectionMap,
) -> Option<&'a Variant> {
    if !selections.is_complete(options) {
        return None;
    }

    variants.iter().find(|variant| {
        options
            .iter()
            .all(|o| variant.option_value(&o.name) == selections.get(&o.name))
            && variant
                .selected_options
                .iter()
                .all(|o| selections.get(&o.name) == Some(o.value.as_str()))
    })
}

/// Reports whether picking `candidate_value` for `option_name` keeps at least
/// one sellable variant reachable.
///
/// The pick is simulated on a copy of `selections`. Options without a
/// selection act as wildcards. Unknown option names are never available.
#[must_use]
pub fn is_value_available(
    options: &[ProductOption],
    variants: &[Variant],
    selections: &SelectionMap,
    option_name: &str,
    candidate_value: &str,
) -> bool {
    if !options.iter().any(|o| o.name == option_name) {
        return false;
    }

    let next = selections.with(option_name, candidate_value);

    variants.iter().any(|variant| {
        variant.available_for_sale
            && variant
                .selected_options
                .iter()
                .all(|o| next.get(&o.name).is_none_or(|sel| sel == o.value))
    })
}

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;
