//! Lead notifications through the Telegram Bot API.

use crate::model::{CalculatorLead, ContactInfo, Lead};
use crate::record::LeadRecord;
use crate::service::LeadSubmitted;
use abect_domain::calculator::Platform;
use abect_domain::config::TelegramConfig;
use abect_domain::constants::CALCULATOR_SOURCE;
use abect_event_bus::{EventBus, EventBusError, EventReceiverExt};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const API_BASE: &str = "https://api.telegram.org";
const TIMEOUT: Duration = Duration::from_secs(10);
const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];
const NBSP: char = '\u{a0}';

/// Escapes every MarkdownV2 reserved character with a backslash.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Groups thousands with a non-breaking space: `32000` becomes `32 000`.
#[must_use]
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%d.%m.%Y, %H:%M").to_string()
}

fn comment_line(contact: &ContactInfo) -> String {
    contact
        .message
        .as_deref()
        .map(|m| format!("💬 *Коментар:* {}", escape_markdown(m)))
        .unwrap_or_default()
}

#[must_use]
pub fn format_simple_message(lead: &ContactInfo, at: NaiveDateTime) -> String {
    format!(
        "🔔 *Нова заявка з сайту\\!*\n\n\
         👤 *Ім'я:* {name}\n\
         📞 *Контакт:* {contact}\n\
         {comment}\n\n\
         📍 *Сторінка:* {source}\n\
         🕐 *Час:* {time}",
        name = escape_markdown(&lead.name),
        contact = escape_markdown(&lead.contact),
        comment = comment_line(lead),
        source = escape_markdown(lead.source.as_deref().unwrap_or("Невідомо")),
        time = escape_markdown(&format_timestamp(at)),
    )
}

#[must_use]
pub fn format_calculator_message(lead: &CalculatorLead, at: NaiveDateTime) -> String {
    let data = &lead.calculator_data;

    let services = match data.additional_services_names.as_deref() {
        Some(names) if !names.is_empty() => names.join(", "),
        _ if !data.additional_services.is_empty() => data.additional_services.join(", "),
        _ => "Немає".to_owned(),
    };
    let platform = match data.platform {
        Some(Platform::Alternate) => "Weblium",
        _ => "Custom",
    };
    let timeline = data
        .estimated_timeline
        .as_deref()
        .map(|t| format!("⏱ *Термін:* {}", escape_markdown(t)))
        .unwrap_or_default();

    format!(
        "🧮 *Нова заявка з калькулятора\\!*\n\n\
         👤 *Ім'я:* {name}\n\
         📞 *Контакт:* {contact}\n\n\
         📋 *Деталі проекту:*\n\
         • *Тип:* {kind}\n\
         • *Платформа:* {platform}\n\
         • *Сторінок:* {pages}\n\
         • *Додатково:* {services}\n\
         • *Терміни:* {urgency}\n\n\
         💰 *Розрахункова вартість:* від {price} грн\n\
         {timeline}\n\n\
         {comment}\n\n\
         📍 *Сторінка:* {source}\n\
         🕐 *Час:* {time}",
        name = escape_markdown(&lead.contact.name),
        contact = escape_markdown(&lead.contact.contact),
        kind = escape_markdown(data.project_type_name.as_deref().unwrap_or(&data.project_type)),
        pages = data.pages_count,
        services = escape_markdown(&services),
        urgency = escape_markdown(data.urgency_name.as_deref().unwrap_or(&data.urgency)),
        price = format_price(data.estimated_price),
        comment = comment_line(&lead.contact),
        source = escape_markdown(lead.contact.source.as_deref().unwrap_or(CALCULATOR_SOURCE)),
        time = escape_markdown(&format_timestamp(at)),
    )
}

#[must_use]
pub fn format_message(lead: &Lead, at: NaiveDateTime) -> String {
    match lead {
        Lead::Simple(contact) => format_simple_message(contact, at),
        Lead::Calculator(lead) => format_calculator_message(lead, at),
    }
}

/// Drops emphasis markers and unescapes everything [`escape_markdown`] escaped.
fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            '*' | '_' | '`' => {},
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<&'a str>,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiReply {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone)]
struct Credentials {
    bot_token: String,
    chat_id: String,
    thread_id: Option<String>,
}

/// Sends lead notifications to a Telegram chat.
///
/// Without a bot token and chat id the notifier stays disabled: every send logs an error
/// and reports `false`.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    credentials: Option<Credentials>,
}

impl TelegramNotifier {
    /// # Errors
    /// If the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, reqwest::Error> {
        Self::with_api_base(config, API_BASE)
    }

    /// Same as [`TelegramNotifier::new`] against another Bot API host.
    ///
    /// # Errors
    /// If the HTTP client cannot be built.
    pub fn with_api_base(
        config: &TelegramConfig,
        api_base: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;

        let credentials = match (&config.bot_token, &config.chat_id) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some(Credentials {
                    bot_token: token.clone(),
                    chat_id: chat.clone(),
                    thread_id: config.thread_id.clone().filter(|t| !t.is_empty()),
                })
            },
            _ => None,
        };

        Ok(Self { client, api_base: api_base.into(), credentials })
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Formats and sends the notification for `record`. Never fails; the outcome is logged
    /// and returned.
    pub async fn send(&self, record: &LeadRecord) -> bool {
        let Some(credentials) = &self.credentials else {
            error!(id = %record.id, "Telegram credentials not configured");
            return false;
        };

        let at = record.created_at.with_timezone(&Local).naive_local();
        let text = format_message(&record.lead, at);
        let thread = credentials.thread_id.as_deref();

        let formatted = SendMessage {
            chat_id: &credentials.chat_id,
            message_thread_id: thread,
            text: &text,
            parse_mode: Some("MarkdownV2"),
        };

        let reply = match self.post(credentials, &formatted).await {
            Ok(None) => {
                info!(id = %record.id, kind = record.lead.kind(), "Telegram notification sent");
                return true;
            },
            Ok(Some(reply)) => reply,
            Err(e) => {
                error!(id = %record.id, error = %e, "Failed to send Telegram notification");
                return false;
            },
        };

        let description = reply.description.unwrap_or_default();
        error!(id = %record.id, description = %description, "Telegram API error");
        if !description.contains("parse") {
            return false;
        }

        let plain_text = strip_formatting(&text);
        let plain = SendMessage {
            chat_id: &credentials.chat_id,
            message_thread_id: thread,
            text: &plain_text,
            parse_mode: None,
        };
        match self.post(credentials, &plain).await {
            Ok(None) => {
                warn!(id = %record.id, "Telegram notification sent as plain text");
                true
            },
            Ok(Some(reply)) => {
                error!(
                    id = %record.id,
                    description = reply.description.as_deref().unwrap_or_default(),
                    "Plain text retry rejected"
                );
                false
            },
            Err(e) => {
                error!(id = %record.id, error = %e, "Plain text retry failed");
                false
            },
        }
    }

    /// `Ok(None)` on success, `Ok(Some(reply))` when the API refused the message.
    async fn post(
        &self,
        credentials: &Credentials,
        body: &SendMessage<'_>,
    ) -> Result<Option<ApiReply>, reqwest::Error> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, credentials.bot_token);
        let response = self.client.post(&url).json(body).send().await?;

        if response.status().is_success() {
            return Ok(None);
        }
        debug!(status = %response.status(), "Telegram API refused the message");
        Ok(Some(response.json::<ApiReply>().await.unwrap_or_default()))
    }
}

/// Runs `notifier` for every [`LeadSubmitted`] event until the bus shuts down.
///
/// # Errors
/// If the subscription cannot be created.
pub fn spawn_notifier(
    bus: &EventBus,
    notifier: TelegramNotifier,
) -> Result<JoinHandle<()>, EventBusError> {
    let mut events = bus.subscribe::<LeadSubmitted>()?;
    if !notifier.is_enabled() {
        warn!("Telegram notifier has no credentials, leads will not be forwarded");
    }

    Ok(tokio::spawn(async move {
        while let Some(event) = events.next_event().await {
            notifier.send(&event.record).await;
        }
        debug!("Lead notifier stopped");
    }))
}
