//! Calculator catalog data as delivered by the content backend.
//!
//! All records serialize in camelCase. Prices are plain numbers in the configured currency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implementation platform of a project.
///
/// `Alternate` is the cheaper site-builder route, `Standard` is custom development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "weblium")]
    Alternate,
    #[serde(alias = "custom")]
    Standard,
}

impl Platform {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alternate => "alternate",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectType {
    pub slug: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub supports_alternate_platform: bool,
    /// Absent or zero means "derive from the standard price".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_platform_base_price: Option<f64>,
    pub standard_base_price: f64,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePricing {
    pub alternate_platform_per_page: f64,
    pub standard_per_page: f64,
    pub min_pages: u32,
    pub max_pages: u32,
    pub default_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub slug: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub flat_price: f64,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyTier {
    pub slug: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_multiplier: f64,
    pub timeline_description: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    pub currency_code: String,
    pub show_price_as_lower_bound: bool,
    pub minimum_order_price: f64,
}

/// The complete, immutable pricing catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorConfig {
    pub project_types: Vec<ProjectType>,
    pub page_pricing: PagePricing,
    pub add_ons: Vec<AddOn>,
    pub urgency_tiers: Vec<UrgencyTier>,
    pub general_settings: GeneralSettings,
}

// --- Default ---
// Built-in catalog used when no configuration document is available.

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            project_types: vec![
                project_type(
                    1,
                    [
                        "landing",
                        "Landing Page",
                        "Односторінковий сайт для продукту або послуги",
                        "layout",
                    ],
                    Some(6000.0),
                    10_000.0,
                ),
                project_type(
                    2,
                    [
                        "corporate",
                        "Корпоративний сайт",
                        "Багатосторінковий сайт для компанії",
                        "building",
                    ],
                    Some(15_000.0),
                    25_000.0,
                ),
                project_type(
                    3,
                    ["shop", "Інтернет-магазин", "Повнофункціональний онлайн-магазин", "store"],
                    Some(25_000.0),
                    40_000.0,
                ),
                project_type(
                    4,
                    [
                        "webapp",
                        "Веб-додаток",
                        "Складний веб-додаток з кастомним функціоналом",
                        "globe",
                    ],
                    None,
                    50_000.0,
                ),
            ],
            page_pricing: PagePricing::default(),
            add_ons: vec![
                add_on(
                    1,
                    [
                        "seo",
                        "SEO-оптимізація",
                        "Базова SEO оптимізація для пошукових систем",
                        "search",
                    ],
                    3000.0,
                ),
                add_on(
                    2,
                    ["copywriting", "Копірайтинг", "Написання текстів для сайту", "text"],
                    5000.0,
                ),
                add_on(
                    3,
                    ["multilang", "Мультимовність", "Підтримка кількох мов на сайті", "languages"],
                    4000.0,
                ),
                add_on(
                    4,
                    ["integrations", "Інтеграції", "CRM, платіжні системи, зовнішні API", "plug"],
                    5000.0,
                ),
                add_on(
                    5,
                    [
                        "animations",
                        "Анімації",
                        "Інтерактивні елементи та мікроанімації",
                        "sparkles",
                    ],
                    3000.0,
                ),
                add_on(
                    6,
                    [
                        "support",
                        "Технічна підтримка",
                        "Підтримка та обслуговування після запуску",
                        "support",
                    ],
                    2000.0,
                ),
            ],
            urgency_tiers: vec![
                urgency(1, ["urgent", "Терміново", "Потрібно якнайшвидше"], 1.5, "до 2 тижнів"),
                urgency(2, ["standard", "Стандартно", "Звичайні терміни"], 1.0, "2-4 тижні"),
                urgency(3, ["relaxed", "Не поспішаємо", "Можна не поспішати"], 0.9, "1-2 місяці"),
                urgency(
                    4,
                    ["undefined", "Ще не визначились", "Поки що невідомо"],
                    1.0,
                    "За домовленістю",
                ),
            ],
            general_settings: GeneralSettings::default(),
        }
    }
}

impl Default for PagePricing {
    fn default() -> Self {
        Self {
            alternate_platform_per_page: 500.0,
            standard_per_page: 1500.0,
            min_pages: 1,
            max_pages: 30,
            default_pages: 5,
        }
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            currency_code: "UAH".to_owned(),
            show_price_as_lower_bound: true,
            minimum_order_price: 5000.0,
        }
    }
}

// [slug, name, description, icon]
fn project_type(order: i32, text: [&str; 4], alternate: Option<f64>, standard: f64) -> ProjectType {
    let [slug, name, description, icon] = text;
    ProjectType {
        slug: slug.to_owned(),
        display_name: name.to_owned(),
        description: Some(description.to_owned()),
        icon: Some(icon.to_owned()),
        supports_alternate_platform: alternate.is_some(),
        alternate_platform_base_price: alternate,
        standard_base_price: standard,
        order,
    }
}

fn add_on(order: i32, text: [&str; 4], price: f64) -> AddOn {
    let [slug, name, description, icon] = text;
    AddOn {
        slug: slug.to_owned(),
        display_name: name.to_owned(),
        description: Some(description.to_owned()),
        icon: Some(icon.to_owned()),
        flat_price: price,
        order,
    }
}

fn urgency(order: i32, text: [&str; 3], multiplier: f64, timeline: &str) -> UrgencyTier {
    let [slug, name, description] = text;
    UrgencyTier {
        slug: slug.to_owned(),
        display_name: name.to_owned(),
        description: Some(description.to_owned()),
        price_multiplier: multiplier,
        timeline_description: timeline.to_owned(),
        order,
    }
}
