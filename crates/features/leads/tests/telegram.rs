use abect_domain::calculator::Platform;
use abect_domain::config::TelegramConfig;
use abect_event_bus::EventBus;
use abect_leads::{
    CalculatorData, CalculatorLead, ContactInfo, Lead, LeadRecord, LeadSubmitted,
    TelegramNotifier, format_calculator_message, format_simple_message, spawn_notifier,
};
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap().and_hms_opt(9, 5, 0).unwrap()
}

fn contact(message: Option<&str>, source: Option<&str>) -> ContactInfo {
    ContactInfo {
        name: "Олена".to_owned(),
        contact: "+380671234567".to_owned(),
        message: message.map(str::to_owned),
        source: source.map(str::to_owned),
        utm: None,
    }
}

fn calculator_lead() -> CalculatorLead {
    CalculatorLead {
        contact: contact(None, None),
        calculator_data: CalculatorData {
            project_type: "shop".to_owned(),
            project_type_name: Some("Інтернет-магазин".to_owned()),
            platform: Some(Platform::Alternate),
            pages_count: 8,
            additional_services: vec!["seo".to_owned(), "support".to_owned()],
            additional_services_names: None,
            urgency: "standard".to_owned(),
            urgency_name: Some("Стандартно".to_owned()),
            estimated_price: 35_500,
            estimated_timeline: Some("2-4 тижні".to_owned()),
        },
    }
}

#[test]
fn simple_message_layout() {
    let text = format_simple_message(&contact(Some("Дзвоніть після 18:00"), None), at());
    assert_eq!(
        text,
        "🔔 *Нова заявка з сайту\\!*\n\n\
         👤 *Ім'я:* Олена\n\
         📞 *Контакт:* \\+380671234567\n\
         💬 *Коментар:* Дзвоніть після 18:00\n\n\
         📍 *Сторінка:* Невідомо\n\
         🕐 *Час:* 14\\.10\\.2026, 09:05"
    );
}

#[test]
fn simple_message_without_comment_keeps_blank_line() {
    let text = format_simple_message(&contact(None, Some("/contacts")), at());
    assert!(text.contains("\\+380671234567\n\n\n📍 *Сторінка:* /contacts\n"));
}

#[test]
fn calculator_message_layout() {
    let text = format_calculator_message(&calculator_lead(), at());
    assert_eq!(
        text,
        "🧮 *Нова заявка з калькулятора\\!*\n\n\
         👤 *Ім'я:* Олена\n\
         📞 *Контакт:* \\+380671234567\n\n\
         📋 *Деталі проекту:*\n\
         • *Тип:* Інтернет\\-магазин\n\
         • *Платформа:* Weblium\n\
         • *Сторінок:* 8\n\
         • *Додатково:* seo, support\n\
         • *Терміни:* Стандартно\n\n\
         💰 *Розрахункова вартість:* від 35\u{a0}500 грн\n\
         ⏱ *Термін:* 2\\-4 тижні\n\n\
         \n\n\
         📍 *Сторінка:* /calculator\n\
         🕐 *Час:* 14\\.10\\.2026, 09:05"
    );
}

#[test]
fn calculator_message_fallbacks() {
    let mut lead = calculator_lead();
    lead.calculator_data.platform = Some(Platform::Standard);
    lead.calculator_data.project_type_name = None;
    lead.calculator_data.additional_services.clear();
    lead.calculator_data.additional_services_names = Some(Vec::new());

    let text = format_calculator_message(&lead, at());
    assert!(text.contains("• *Тип:* shop\n"));
    assert!(text.contains("• *Платформа:* Custom\n"));
    assert!(text.contains("• *Додатково:* Немає\n"));

    lead.calculator_data.additional_services_names = Some(vec!["SEO-оптимізація".to_owned()]);
    let text = format_calculator_message(&lead, at());
    assert!(text.contains("• *Додатково:* SEO\\-оптимізація\n"));
}

/// Characters MarkdownV2 reserves that appear without a preceding backslash. `*` is
/// left out since the layouts use it for bold.
fn unescaped_reserved(text: &str) -> Vec<char> {
    const RESERVED: &str = "\\_[]()~`>#+-=|{}.!";
    let mut found = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if RESERVED.contains(c) {
            found.push(c);
        }
    }
    found
}

fn noisy_contact() -> ContactInfo {
    ContactInfo {
        name: "O'Brien_[x] *Jr.*".to_owned(),
        contact: "john.doe+tg@mail-box.com.ua".to_owned(),
        message: Some("Бюджет ~50k (або > 40k)! #urgent {v=2} | `code` C:\\temp".to_owned()),
        source: Some("/calculator?utm_source=fb&ref=a.b-c".to_owned()),
        utm: None,
    }
}

#[test]
fn markdown_layouts_escape_every_reserved_character() {
    let text = format_simple_message(&contact(None, None), at());
    assert_eq!(unescaped_reserved(&text), Vec::<char>::new());

    let text = format_simple_message(&noisy_contact(), at());
    assert_eq!(unescaped_reserved(&text), Vec::<char>::new());

    let mut lead = calculator_lead();
    lead.contact = noisy_contact();
    lead.calculator_data.project_type_name = Some("Web-app (SaaS)".to_owned());
    lead.calculator_data.additional_services_names = Some(vec!["SEO + аналітика".to_owned()]);
    lead.calculator_data.urgency_name = Some("Терміново!".to_owned());
    lead.calculator_data.estimated_timeline = Some("1-2 тижні.".to_owned());
    let text = format_calculator_message(&lead, at());
    assert_eq!(unescaped_reserved(&text), Vec::<char>::new());

    let text = format_calculator_message(&calculator_lead(), at());
    assert_eq!(unescaped_reserved(&text), Vec::<char>::new());
}

// --- Bot API stub ---

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<Value>>>,
    description: &'static str,
}

async fn send_message(
    State(stub): State<Stub>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let formatted = body.get("parse_mode").is_some();
    stub.requests.lock().unwrap().push(body);
    if formatted && !stub.description.is_empty() {
        (StatusCode::BAD_REQUEST, Json(json!({"ok": false, "description": stub.description})))
    } else {
        (StatusCode::OK, Json(json!({"ok": true})))
    }
}

async fn serve(description: &'static str) -> (Stub, TelegramNotifier) {
    let stub = Stub { requests: Arc::default(), description };
    let app = Router::new()
        .route("/botTEST/sendMessage", post(send_message))
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let config = TelegramConfig {
        bot_token: Some("TEST".to_owned()),
        chat_id: Some("-100123".to_owned()),
        thread_id: Some("7".to_owned()),
    };
    let notifier = TelegramNotifier::with_api_base(&config, format!("http://{addr}")).unwrap();
    (stub, notifier)
}

fn record() -> LeadRecord {
    LeadRecord::new(Lead::Simple(contact(Some("_важливо_"), None)))
}

#[tokio::test]
async fn sends_markdown_to_the_configured_chat() {
    let (stub, notifier) = serve("").await;
    assert!(notifier.send(&record()).await);

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["chat_id"], "-100123");
    assert_eq!(requests[0]["message_thread_id"], "7");
    assert_eq!(requests[0]["parse_mode"], "MarkdownV2");
}

#[tokio::test]
async fn parse_errors_are_retried_as_plain_text() {
    let (stub, notifier) = serve("Bad Request: can't parse entities").await;
    assert!(notifier.send(&record()).await);

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].get("parse_mode").is_none());
    let text = requests[1]["text"].as_str().unwrap();
    assert!(!text.contains(['*', '`', '\\']));
    assert!(text.contains("🔔 Нова заявка з сайту!\n"));
    assert!(text.contains("📞 Контакт: +380671234567\n"));
    assert!(text.contains("💬 Коментар: _важливо_\n"));
    assert!(text.contains("🕐 Час: "));
    assert_eq!(requests[1]["message_thread_id"], "7");
}

#[tokio::test]
async fn other_api_errors_are_not_retried() {
    let (stub, notifier) = serve("Forbidden: bot was blocked by the user").await;
    assert!(!notifier.send(&record()).await);
    assert_eq!(stub.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn disabled_notifier_reports_failure() {
    let notifier = TelegramNotifier::new(&TelegramConfig::default()).unwrap();
    assert!(!notifier.send(&record()).await);
}

#[tokio::test]
async fn notifier_task_forwards_submitted_leads() {
    let (stub, notifier) = serve("").await;
    let bus = EventBus::new();
    let handle = spawn_notifier(&bus, notifier).unwrap();

    bus.publish(LeadSubmitted { record: record() }).unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while stub.requests.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    let _ = bus.shutdown();
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}
