use regex::Regex;

use crate::core::errors::ApiError;

/// Strips reasoning spans from model output before it reaches the user.
///
/// The delimiters are configurable because they are a property of the chat
/// model, not of this service. Tags are escaped before compilation, so they
/// match literally.
pub struct ResponseCleaner {
    pattern: Regex,
}

impl ResponseCleaner {
    pub fn new(open_tag: &str, close_tag: &str) -> Result<Self, ApiError> {
        let pattern = Regex::new(&format!(
            "(?s){}.*?{}",
            regex::escape(open_tag),
            regex::escape(close_tag)
        ))
        .map_err(ApiError::internal)?;

        Ok(Self { pattern })
    }

    /// Removes every delimited span, tags included, and trims the result.
    /// An opening tag with no matching close is left in place.
    pub fn clean(&self, raw: &str) -> String {
        self.pattern.replace_all(raw, "").trim().to_string()
    }
}
