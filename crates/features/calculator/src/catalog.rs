use crate::error::{CalculatorError, CalculatorErrorExt};
use abect_domain::calculator::{
    AddOn, CalculatorConfig, GeneralSettings, PagePricing, ProjectType, UrgencyTier,
};
use fxhash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Validated, slug-indexed view over a [`CalculatorConfig`].
///
/// Built once and shared between sessions through an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: CalculatorConfig,
    project_types: FxHashMap<String, usize>,
    add_ons: FxHashMap<String, usize>,
    urgency_tiers: FxHashMap<String, usize>,
}

impl Catalog {
    /// Indexes every collection by slug and checks the numeric invariants.
    ///
    /// # Errors
    /// * [`CalculatorError::DuplicateSlug`] when a slug repeats within a collection.
    /// * [`CalculatorError::InvalidConfig`] for an empty slug, `minPages < 1`,
    ///   `minPages > maxPages`, or a negative or non-finite price/multiplier.
    pub fn new(config: CalculatorConfig) -> Result<Self, CalculatorError> {
        validate_pages(&config.page_pricing)?;
        validate_settings(&config.general_settings)?;

        for project in &config.project_types {
            check_amount(project.standard_base_price, &project.slug, "standardBasePrice")?;
            if let Some(alternate) = project.alternate_platform_base_price {
                check_amount(alternate, &project.slug, "alternatePlatformBasePrice")?;
            }
        }
        for add_on in &config.add_ons {
            check_amount(add_on.flat_price, &add_on.slug, "flatPrice")?;
        }
        for tier in &config.urgency_tiers {
            check_amount(tier.price_multiplier, &tier.slug, "priceMultiplier")?;
        }

        let project_types = index(&config.project_types, |p| &p.slug, "projectTypes")?;
        let add_ons = index(&config.add_ons, |a| &a.slug, "addOns")?;
        let urgency_tiers = index(&config.urgency_tiers, |u| &u.slug, "urgencyTiers")?;

        debug!(
            project_types = project_types.len(),
            add_ons = add_ons.len(),
            urgency_tiers = urgency_tiers.len(),
            "Catalog indexed"
        );

        Ok(Self { config, project_types, add_ons, urgency_tiers })
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    /// Malformed JSON or any error from [`Catalog::new`].
    pub fn from_json(raw: &str) -> Result<Self, CalculatorError> {
        let config: CalculatorConfig =
            serde_json::from_str(raw).context("Parsing calculator config")?;
        Self::new(config)
    }

    /// Reads a JSON configuration document from disk.
    ///
    /// # Errors
    /// Unreadable file, malformed JSON, or any error from [`Catalog::new`].
    pub fn from_file(path: &Path) -> Result<Self, CalculatorError> {
        let raw = fs::read_to_string(path)
            .context(format!("Reading calculator config {}", path.display()))?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), "Calculator config loaded");
        Ok(catalog)
    }

    /// The built-in catalog.
    ///
    /// # Errors
    /// Only if the built-in defaults violate the catalog invariants.
    pub fn fallback() -> Result<Self, CalculatorError> {
        Self::new(CalculatorConfig::default()).context("Built-in calculator config")
    }

    #[must_use]
    pub const fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    #[must_use]
    pub const fn page_pricing(&self) -> &PagePricing {
        &self.config.page_pricing
    }

    #[must_use]
    pub const fn settings(&self) -> &GeneralSettings {
        &self.config.general_settings
    }

    #[must_use]
    pub fn project_type(&self, slug: &str) -> Option<&ProjectType> {
        self.project_types.get(slug).map(|&i| &self.config.project_types[i])
    }

    #[must_use]
    pub fn add_on(&self, slug: &str) -> Option<&AddOn> {
        self.add_ons.get(slug).map(|&i| &self.config.add_ons[i])
    }

    #[must_use]
    pub fn urgency(&self, slug: &str) -> Option<&UrgencyTier> {
        self.urgency_tiers.get(slug).map(|&i| &self.config.urgency_tiers[i])
    }

    /// `defaultPages` forced into `[minPages, maxPages]`.
    #[must_use]
    pub fn default_pages(&self) -> u32 {
        self.clamp_pages(self.config.page_pricing.default_pages)
    }

    #[must_use]
    pub fn clamp_pages(&self, pages: u32) -> u32 {
        let pricing = &self.config.page_pricing;
        pages.clamp(pricing.min_pages, pricing.max_pages)
    }
}

fn index<T>(
    items: &[T],
    slug: impl Fn(&T) -> &String,
    collection: &'static str,
) -> Result<FxHashMap<String, usize>, CalculatorError> {
    let mut map = FxHashMap::default();
    for (i, item) in items.iter().enumerate() {
        let key = slug(item);
        if key.trim().is_empty() {
            return Err(CalculatorError::InvalidConfig {
                message: format!("empty slug at position {i}").into(),
                context: Some(collection.into()),
            });
        }
        if map.insert(key.clone(), i).is_some() {
            return Err(CalculatorError::DuplicateSlug {
                message: key.clone().into(),
                context: Some(collection.into()),
            });
        }
    }
    Ok(map)
}

fn validate_pages(pricing: &PagePricing) -> Result<(), CalculatorError> {
    if pricing.min_pages < 1 {
        return Err(CalculatorError::InvalidConfig {
            message: "minPages must be at least 1".into(),
            context: Some("pagePricing".into()),
        });
    }
    if pricing.min_pages > pricing.max_pages {
        return Err(CalculatorError::InvalidConfig {
            message: format!(
                "minPages ({}) exceeds maxPages ({})",
                pricing.min_pages, pricing.max_pages
            )
            .into(),
            context: Some("pagePricing".into()),
        });
    }
    check_amount(pricing.alternate_platform_per_page, "pagePricing", "alternatePlatformPerPage")?;
    check_amount(pricing.standard_per_page, "pagePricing", "standardPerPage")
}

fn validate_settings(settings: &GeneralSettings) -> Result<(), CalculatorError> {
    check_amount(settings.minimum_order_price, "generalSettings", "minimumOrderPrice")
}

fn check_amount(value: f64, owner: &str, field: &str) -> Result<(), CalculatorError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(CalculatorError::InvalidConfig {
        message: format!("{owner}.{field} must be a non-negative number, got {value}").into(),
        context: None,
    })
}
