//! UI-parameter validation (spec.md §4.5). Grounded on bip_metainfo's
//! `builder::is_valid_url`, generalized to the full set of checks the spec
//! names and to return the *first* failure rather than just a bool.

use url::Url;

use crate::error::CoreError;

const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '\\', '/', '|', '?', '*'];
const MAX_NAME_LEN: usize = 255;

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("Torrent name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(
            "Torrent name cannot be longer than 255 characters",
        ));
    }
    if let Some(bad) = name.chars().find(|c| RESERVED_NAME_CHARS.contains(c)) {
        return Err(CoreError::validation(format!(
            "Torrent name cannot contain the reserved character '{bad}'"
        )));
    }
    Ok(())
}

/// Splits `text` on runs of Unicode whitespace, validates each non-empty
/// token as a tracker URL, and returns them in order. `str::split_whitespace`
/// already drops empty tokens between runs, matching the spec exactly.
pub fn validate_trackers(text: &str) -> Result<Vec<String>, CoreError> {
    text.split_whitespace().map(validate_tracker_url).collect()
}

pub fn validate_web_seeds(text: &str) -> Result<Vec<String>, CoreError> {
    text.split_whitespace().map(validate_web_seed_url).collect()
}

fn validate_tracker_url(candidate: &str) -> Result<String, CoreError> {
    let url = Url::parse(candidate).map_err(|_| {
        CoreError::validation(format!("'{candidate}' is not a valid tracker URL"))
    })?;

    if url.cannot_be_a_base() {
        return Err(CoreError::validation(format!(
            "'{candidate}' is not a valid absolute tracker URL"
        )));
    }

    let path = url.path();
    if !(path.ends_with("announce") || path.ends_with("announce/")) {
        return Err(CoreError::validation(format!(
            "Tracker URL '{candidate}' must end with \"announce\" or \"announce/\""
        )));
    }

    Ok(candidate.to_owned())
}

fn validate_web_seed_url(candidate: &str) -> Result<String, CoreError> {
    Url::parse(candidate)
        .map(|_| candidate.to_owned())
        .map_err(|_| CoreError::validation(format!("'{candidate}' is not a valid web seed URL")))
}
