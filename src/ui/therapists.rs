use crate::core::auth::AuthController;
use crate::core::chat::session_cost;
use crate::core::directory::TherapistDirectory;
use crate::ui::prompt::{confirm, select_or_cancel};
use crate::ui::render::{format_money, therapists_table};
use std::error::Error;

pub async fn run_therapists(
    auth: &AuthController,
    book: Option<String>,
    minutes: u32,
    assume_yes: bool,
) -> Result<(), Box<dyn Error>> {
    let api = auth.api().clone();
    let credential = auth.credential().cloned();
    let mut directory = TherapistDirectory::new();

    let therapists = directory.load(api.as_ref(), credential.as_ref()).await?;
    if therapists.is_empty() {
        println!("No therapists are available right now. Try an AI session: thrapy chat");
        return Ok(());
    }
    println!("{}", therapists_table(therapists));

    let selector = match book {
        Some(selector) => selector,
        None => {
            let labels: Vec<String> = therapists
                .iter()
                .map(|therapist| {
                    format!(
                        "{} ({} yrs, {}/hr)",
                        therapist.specialization,
                        therapist.years_experience,
                        format_money(therapist.hourly_rate)
                    )
                })
                .collect();
            match select_or_cancel("Book a session with", &labels)? {
                Some(index) => therapists[index].id.clone(),
                None => return Ok(()),
            }
        }
    };

    let Some(therapist) = directory.find(&selector) else {
        return Err(format!("No therapist matches '{selector}'").into());
    };
    let cost = format_money(session_cost(therapist.hourly_rate, minutes));
    let question = format!(
        "Book a {minutes}-minute {} session for {cost}?",
        therapist.specialization
    );
    if !assume_yes && !confirm(&question, true)? {
        println!("Booking cancelled.");
        return Ok(());
    }

    let booking = directory
        .book(api.as_ref(), credential.as_ref(), &selector, minutes)
        .await?;
    println!(
        "✅ Session booked! {} minutes for {}. Session id: {}",
        booking.duration_minutes,
        format_money(booking.cost),
        booking.session
    );
    Ok(())
}
