//! Plain-text rendering of backend records.

use crate::api::{PaymentRecord, SessionRecord, TherapistProfile};
use crate::core::message::{ChatMessage, Origin};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// `2024-05-01T10:00:00Z` style timestamps trimmed to the date.
fn short_date(value: Option<&str>) -> String {
    match value {
        Some(value) => value.get(..10).unwrap_or(value).to_string(),
        None => "-".to_string(),
    }
}

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn therapists_table(therapists: &[TherapistProfile]) -> Table {
    let mut table = base_table(&["#", "Specialization", "Experience", "Rate", "About", "ID"]);
    for (index, therapist) in therapists.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&therapist.specialization).fg(Color::Cyan),
            Cell::new(format!("{} yrs", therapist.years_experience)),
            Cell::new(format!("{}/hr", format_money(therapist.hourly_rate))),
            Cell::new(&therapist.bio),
            Cell::new(&therapist.id).fg(Color::DarkGrey),
        ]);
    }
    table
}

pub fn sessions_table(sessions: &[SessionRecord]) -> Table {
    let mut table = base_table(&["Date", "Type", "Minutes", "Cost", "Status", "ID"]);
    for session in sessions {
        table.add_row(vec![
            Cell::new(short_date(session.created_at.as_deref())),
            Cell::new(session.session_type.as_str()).fg(Color::Cyan),
            Cell::new(session.duration_minutes),
            Cell::new(format_money(session.cost)),
            Cell::new(session.status.as_deref().unwrap_or("-")),
            Cell::new(&session.id).fg(Color::DarkGrey),
        ]);
    }
    table
}

pub fn payments_table(payments: &[PaymentRecord]) -> Table {
    let mut table = base_table(&["Date", "Type", "Amount", "Status", "Session"]);
    for payment in payments {
        table.add_row(vec![
            Cell::new(short_date(payment.created_at.as_deref())),
            Cell::new(&payment.payment_type).fg(Color::Cyan),
            Cell::new(format_money(payment.amount)),
            Cell::new(payment.status.as_deref().unwrap_or("-")),
            Cell::new(&payment.session_id).fg(Color::DarkGrey),
        ]);
    }
    table
}

pub fn payments_total(payments: &[PaymentRecord]) -> f64 {
    payments.iter().map(|payment| payment.amount).sum()
}

pub fn render_message(message: &ChatMessage) -> String {
    let prefix = match message.origin {
        Origin::User => "🧑",
        Origin::Assistant => "🤖",
        Origin::Error => "⚠️ ",
    };
    format!("{prefix} {}: {}", message.origin.label(), message.text)
}
