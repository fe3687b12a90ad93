use abect_domain::calculator::{CalculatorConfig, Platform};
use abect_domain::config::{AppConfig, ServerConfig, TelegramConfig};
use serde_json::json;

#[test]
fn app_config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 3000);

    let cfg = AppConfig::default();
    assert!(cfg.calculator.config_path.is_none());
    assert!(!cfg.telegram.is_configured());
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from("data"));
}

#[test]
fn app_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "127.0.0.1", "port": 8080 },
        "telegram": { "bot_token": "123:abc", "chat_id": "-100" }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert!(cfg.telegram.is_configured());
    assert!(cfg.telegram.thread_id.is_none());
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from("data"));
}

#[test]
fn telegram_debug_hides_token() {
    let tg = TelegramConfig {
        bot_token: Some("secret-token".to_owned()),
        chat_id: Some("42".to_owned()),
        thread_id: None,
    };
    let rendered = format!("{tg:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn fallback_catalog_matches_site_defaults() {
    let cfg = CalculatorConfig::default();
    let slugs: Vec<_> = cfg.project_types.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["landing", "corporate", "shop", "webapp"]);

    let webapp = &cfg.project_types[3];
    assert!(!webapp.supports_alternate_platform);
    assert!(webapp.alternate_platform_base_price.is_none());

    assert_eq!(cfg.add_ons.len(), 6);
    assert_eq!(cfg.urgency_tiers[0].price_multiplier, 1.5);
    assert_eq!(cfg.page_pricing.default_pages, 5);
    assert_eq!(cfg.general_settings.currency_code, "UAH");
}

#[test]
fn calculator_config_uses_camel_case() {
    let value = serde_json::to_value(CalculatorConfig::default()).unwrap();
    assert!(value["projectTypes"][0]["supportsAlternatePlatform"].as_bool().unwrap());
    assert_eq!(value["pagePricing"]["standardPerPage"], 1500.0);
    assert_eq!(value["generalSettings"]["minimumOrderPrice"], 5000.0);

    let back: CalculatorConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, CalculatorConfig::default());
}

#[test]
fn platform_accepts_legacy_names() {
    let legacy: Platform = serde_json::from_str("\"weblium\"").unwrap();
    let custom: Platform = serde_json::from_str("\"custom\"").unwrap();
    assert_eq!(legacy, Platform::Alternate);
    assert_eq!(custom, Platform::Standard);
    assert_eq!(serde_json::to_string(&Platform::Alternate).unwrap(), "\"alternate\"");
}
