//! Field constraints and validation functions for user-supplied input.
//!
//! Handlers call these before touching the database so malformed requests
//! are rejected with `400 VALIDATION_ERROR` instead of a constraint error.

use validator::ValidateEmail;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Length limits
// ---------------------------------------------------------------------------

/// Maximum length of client, project and shotlist names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a client description or shotlist location.
pub const MAX_SHORT_TEXT_LENGTH: usize = 500;

/// Maximum length of a shot name.
pub const MAX_SHOT_NAME_LENGTH: usize = 100;

/// Maximum length of a camera angle label.
pub const MAX_CAMERA_ANGLE_LENGTH: usize = 100;

/// Maximum length of an aspect ratio label (e.g. `2.39:1`).
pub const MAX_ASPECT_RATIO_LENGTH: usize = 20;

/// Username length bounds.
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Shot attributes
// ---------------------------------------------------------------------------

/// Shot duration bounds in minutes (one minute to a full day).
pub const MIN_SHOT_DURATION: i32 = 1;
pub const MAX_SHOT_DURATION: i32 = 1440;

/// Frame rate bounds.
pub const MIN_FPS: i32 = 1;
pub const MAX_FPS: i32 = 1000;

pub const SHOT_TYPE_STANDARD: &str = "Standard";
pub const SHOT_TYPE_LUNCH: &str = "Lunch";
pub const SHOT_TYPE_BREAK: &str = "Break";

/// All valid shot types.
pub const VALID_SHOT_TYPES: &[&str] = &[SHOT_TYPE_STANDARD, SHOT_TYPE_LUNCH, SHOT_TYPE_BREAK];

/// All valid time-of-day labels.
pub const VALID_TIMES_OF_DAY: &[&str] = &["dawn", "morning", "afternoon", "evening", "night"];

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Require a non-blank value of at most `max` characters.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    validate_max_length(field, value, max)
}

/// Same as [`validate_required_text`] but for fields that may be omitted.
pub fn validate_optional_required_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| validate_required_text(field, v, max))
}

/// Allow any value (including empty) up to `max` characters.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| validate_max_length(field, v, max))
}

fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Shot duration must be within [`MIN_SHOT_DURATION`]..=[`MAX_SHOT_DURATION`] minutes.
pub fn validate_shot_duration(minutes: i32) -> Result<(), CoreError> {
    if !(MIN_SHOT_DURATION..=MAX_SHOT_DURATION).contains(&minutes) {
        return Err(CoreError::Validation(format!(
            "shot_duration must be between {MIN_SHOT_DURATION} and {MAX_SHOT_DURATION} minutes"
        )));
    }
    Ok(())
}

pub fn validate_fps(fps: i32) -> Result<(), CoreError> {
    if !(MIN_FPS..=MAX_FPS).contains(&fps) {
        return Err(CoreError::Validation(format!(
            "fps must be between {MIN_FPS} and {MAX_FPS}"
        )));
    }
    Ok(())
}

pub fn validate_shot_type(shot_type: &str) -> Result<(), CoreError> {
    if VALID_SHOT_TYPES.contains(&shot_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid shot_type '{shot_type}'. Must be one of: {}",
            VALID_SHOT_TYPES.join(", ")
        )))
    }
}

pub fn validate_time_of_day(time_of_day: &str) -> Result<(), CoreError> {
    if VALID_TIMES_OF_DAY.contains(&time_of_day) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid time_of_day '{time_of_day}'. Must be one of: {}",
            VALID_TIMES_OF_DAY.join(", ")
        )))
    }
}

/// Custom properties are free-form but must be a JSON object.
pub fn validate_custom_properties(value: &serde_json::Value) -> Result<(), CoreError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "custom_properties must be a JSON object".into(),
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Usernames are 3-100 characters of ASCII letters, digits, `_`, `-` or `.`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits, '_', '-' and '.'".into(),
        ));
    }
    Ok(())
}
