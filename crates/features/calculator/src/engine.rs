//! Price and timeline estimation.
//!
//! A pure function of the catalog and a selection. It never fails: missing prerequisites
//! produce a zero price, unresolvable references are skipped.

use crate::catalog::Catalog;
use crate::selection::Selection;
use abect_domain::calculator::Platform;
use serde::Serialize;
use tracing::warn;

/// Share of the standard base price used when an alternate base price is not configured.
pub const ALTERNATE_BASE_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub price: u64,
    pub timeline: String,
}

#[must_use]
pub fn estimate(catalog: &Catalog, selection: &Selection) -> Estimate {
    let price = raw_price(catalog, selection).map_or(0, round_half_up);

    let timeline = selection
        .urgency
        .as_deref()
        .and_then(|slug| catalog.urgency(slug))
        .map(|tier| tier.timeline_description.clone())
        .unwrap_or_default();

    Estimate { price, timeline }
}

fn raw_price(catalog: &Catalog, selection: &Selection) -> Option<f64> {
    let platform = selection.platform?;
    let project = catalog.project_type(selection.project_type.as_deref()?)?;
    let pricing = catalog.page_pricing();

    // A zero alternate price counts as "not configured".
    let (base, per_page) = match platform {
        Platform::Alternate => (
            project
                .alternate_platform_base_price
                .filter(|price| *price != 0.0)
                .unwrap_or(project.standard_base_price * ALTERNATE_BASE_RATIO),
            pricing.alternate_platform_per_page,
        ),
        Platform::Standard => (project.standard_base_price, pricing.standard_per_page),
    };

    // The base price already covers one page.
    let extra_pages = f64::from(selection.page_count.saturating_sub(1));
    #[allow(clippy::suboptimal_flops)]
    let mut price = base + extra_pages * per_page;

    for slug in &selection.add_ons {
        match catalog.add_on(slug) {
            Some(add_on) => price += add_on.flat_price,
            None => warn!(add_on = %slug, "Ignoring add-on missing from catalog"),
        }
    }

    if let Some(slug) = selection.urgency.as_deref() {
        match catalog.urgency(slug) {
            Some(tier) => price *= tier.price_multiplier,
            None => warn!(urgency = %slug, "Ignoring urgency tier missing from catalog"),
        }
    }

    Some(price.max(catalog.settings().minimum_order_price))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_half_up(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 { (value + 0.5).floor() as u64 } else { 0 }
}
