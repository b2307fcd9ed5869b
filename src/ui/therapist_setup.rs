//! Profile and weekly availability for therapist accounts.

use crate::api::{
    AvailabilityRequest, AvailabilitySlot, Identity, Role, TherapistProfile,
    TherapistRegistration,
};
use crate::core::auth::AuthController;
use crate::ui::prompt::text_or_prompt;
use crate::ui::render::format_money;
use std::error::Error;

const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

#[derive(Debug, Default)]
pub struct ProfileInput {
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    pub hourly_rate: Option<f64>,
    pub years_experience: Option<u32>,
    pub bio: Option<String>,
}

fn require_therapist(identity: Option<&Identity>) -> Result<&Identity, Box<dyn Error>> {
    match identity {
        Some(identity) if identity.role == Role::Therapist => Ok(identity),
        Some(_) => Err("Only therapist accounts can do this".into()),
        None => Err("Not signed in".into()),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, label: &str) -> Result<T, Box<dyn Error>> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{label} must be a number, got '{}'", raw.trim()).into())
}

fn day_index(day: &str) -> Option<u8> {
    let day = day.trim().to_ascii_lowercase();
    if let Ok(index) = day.parse::<u8>() {
        return (index < 7).then_some(index);
    }
    DAYS.iter()
        .position(|name| day.starts_with(name))
        .and_then(|index| u8::try_from(index).ok())
}

fn parse_time(value: &str) -> Option<String> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u8 = hours.parse().ok()?;
    let minutes: u8 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then(|| format!("{hours:02}:{minutes:02}"))
}

/// Parse `mon 09:00-17:00` (or `0 09:00-17:00`) into a weekly slot.
pub fn parse_slot(input: &str) -> Result<AvailabilitySlot, String> {
    let invalid = || format!("'{input}' is not a slot like 'mon 09:00-17:00'");
    let (day, range) = input.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let day_of_week = day_index(day).ok_or_else(invalid)?;
    let (start, end) = range.trim().split_once('-').ok_or_else(invalid)?;
    let start_time = parse_time(start).ok_or_else(invalid)?;
    let end_time = parse_time(end).ok_or_else(invalid)?;
    // Zero-padded HH:MM compares correctly as text
    if start_time >= end_time {
        return Err(format!("'{input}' ends before it starts"));
    }
    Ok(AvailabilitySlot {
        day_of_week,
        start_time,
        end_time,
    })
}

/// The signed-in therapist's own listing, if published.
pub fn find_own_profile<'a>(
    therapists: &'a [TherapistProfile],
    identity: &Identity,
) -> Option<&'a TherapistProfile> {
    therapists
        .iter()
        .find(|therapist| therapist.user_id == identity.id)
}

pub async fn register_profile(
    auth: &AuthController,
    input: ProfileInput,
) -> Result<(), Box<dyn Error>> {
    require_therapist(auth.current_user())?;

    let hourly_rate = match input.hourly_rate {
        Some(rate) => rate,
        None => parse_number(&text_or_prompt(None, "Hourly rate (USD)")?, "Hourly rate")?,
    };
    if !(hourly_rate.is_finite() && hourly_rate > 0.0) {
        return Err("Hourly rate must be greater than zero".into());
    }
    let years_experience = match input.years_experience {
        Some(years) => years,
        None => parse_number(
            &text_or_prompt(None, "Years of experience")?,
            "Years of experience",
        )?,
    };
    let request = TherapistRegistration {
        license_number: text_or_prompt(input.license_number, "License number")?,
        specialization: text_or_prompt(input.specialization, "Specialization")?,
        hourly_rate,
        bio: text_or_prompt(input.bio, "Short bio")?,
        years_experience,
    };
    if request.license_number.trim().is_empty() || request.specialization.trim().is_empty() {
        return Err("License number and specialization are required".into());
    }

    let profile = auth
        .api()
        .register_therapist_profile(auth.credential(), &request)
        .await?;
    println!(
        "✅ Profile published: {} at {}/hr (id {})",
        profile.specialization,
        format_money(profile.hourly_rate),
        profile.id
    );
    Ok(())
}

pub async fn set_availability(
    auth: &AuthController,
    slots: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let identity = require_therapist(auth.current_user())?;
    if slots.is_empty() {
        return Err("Give at least one slot, e.g. 'thrapy availability \"mon 09:00-17:00\"'".into());
    }
    let availability = slots
        .iter()
        .map(|slot| parse_slot(slot))
        .collect::<Result<Vec<_>, _>>()?;

    let therapists = auth.api().list_therapists(auth.credential()).await?;
    let profile = find_own_profile(&therapists, identity)
        .ok_or("No therapist profile found. Run 'thrapy therapist-profile' first.")?;

    let request = AvailabilityRequest {
        therapist_id: profile.id.clone(),
        availability,
    };
    let message = auth
        .api()
        .set_availability(auth.credential(), &request)
        .await?;
    println!("✅ {message}");
    for slot in &request.availability {
        println!(
            "  {} {}-{}",
            DAYS[usize::from(slot.day_of_week)],
            slot.start_time,
            slot.end_time
        );
    }
    Ok(())
}
