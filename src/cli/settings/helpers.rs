//! Helper functions for settings operations.

use crate::core::config::Config;

use super::error::SettingError;

/// Run `f` against the on-disk config, saving only if it succeeds.
pub fn mutate_config<F>(f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut outcome = None;
    let saved = Config::mutate(|config| {
        let result = f(config);
        let succeeded = result.is_ok();
        outcome = Some(result);
        if succeeded {
            Ok(())
        } else {
            Err("setting rejected".into())
        }
    });

    match (outcome, saved) {
        (Some(Err(err)), _) => Err(err),
        (Some(Ok(message)), Ok(())) => Ok(message),
        (_, Err(err)) => Err(SettingError::Persist(err.to_string())),
        (None, Ok(())) => Err(SettingError::Persist(
            "configuration was not updated".to_string(),
        )),
    }
}

/// The single value after the key, or a usage error.
pub fn single_value<'a>(
    args: &'a [String],
    hint: &'static str,
    example: &'static str,
) -> Result<&'a str, SettingError> {
    let joined = args.first().map(|value| value.trim()).unwrap_or_default();
    if joined.is_empty() {
        return Err(SettingError::MissingArgs { hint, example });
    }
    Ok(joined)
}

pub fn parse_minutes(key: &'static str, input: &str) -> Result<u32, SettingError> {
    match input.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(SettingError::InvalidValue {
            key,
            reason: format!("'{input}' is not a positive number of minutes"),
        }),
    }
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}
