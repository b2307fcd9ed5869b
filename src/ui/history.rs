use crate::core::auth::AuthController;
use crate::ui::render::{format_money, payments_table, payments_total, sessions_table};
use std::error::Error;

pub async fn show_sessions(auth: &AuthController) -> Result<(), Box<dyn Error>> {
    let sessions = auth.api().list_sessions(auth.credential()).await?;
    if sessions.is_empty() {
        println!("No sessions yet. Start one with 'thrapy chat' or 'thrapy therapists'.");
        return Ok(());
    }
    println!("{}", sessions_table(&sessions));
    println!(
        "{} session{}. Resume an AI session with: thrapy chat --session <ID>",
        sessions.len(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

pub async fn show_payments(auth: &AuthController) -> Result<(), Box<dyn Error>> {
    let payments = auth.api().payment_history(auth.credential()).await?;
    if payments.is_empty() {
        println!("No payments yet.");
        return Ok(());
    }
    println!("{}", payments_table(&payments));
    println!("Total: {}", format_money(payments_total(&payments)));
    Ok(())
}
