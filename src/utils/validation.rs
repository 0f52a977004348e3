// file: src/utils/validation.rs
// description: input validation applied before requests leave the client
// reference: input validation patterns

use crate::error::{AlephError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AlephError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Entity ids travel as a single path segment.
    pub fn validate_entity_id(entity_id: &str) -> Result<()> {
        if entity_id.trim().is_empty() {
            return Err(AlephError::Validation(
                "Entity id must not be empty".to_string(),
            ));
        }

        if entity_id.contains('/') {
            return Err(AlephError::Validation(format!(
                "Entity id must not contain '/': {}",
                entity_id
            )));
        }

        Ok(())
    }

    pub fn validate_limit(limit: u32) -> Result<()> {
        if limit == 0 {
            return Err(AlephError::Validation(
                "Limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_chars).collect();
            format!("{}...", head)
        }
    }
}
