//! Small text utilities for display and file naming.

use crate::Error;

/// Default spacer inserted by [`sm`].
pub const DEFAULT_SPACER: &str = "...";

/// Show the prefix and suffix of `text` if it is longer than `limit` characters.
///
/// The result is exactly `limit` characters long when shortening happens.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if `limit` leaves no room for a prefix around `spacer`.
pub fn sm(text: &str, limit: usize, spacer: &str) -> Result<String, Error> {
    let len = text.chars().count();
    if len <= limit {
        return Ok(text.to_string());
    }

    let spacer_len = spacer.chars().count();
    let prefix = limit.saturating_sub(spacer_len) / 2;
    if prefix == 0 {
        return Err(Error::InvalidInput(format!(
            "text limit {limit} not long enough for prefix/suffix spacer '{spacer}'"
        )));
    }
    let suffix = limit - prefix - spacer_len;

    let head: String = text.chars().take(prefix).collect();
    let tail: String = text.chars().skip(len - suffix).collect();
    Ok(format!("{head}{spacer}{tail}"))
}

/// Convert a title into a canonical, filename-friendly string.
///
/// `"The Call of Cthulhu!"` becomes `"the_call_of_cthulhu"`.
pub fn title_to_filename(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}
