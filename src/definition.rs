use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PollError, validation_error};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub label: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Immutable description of a single poll. Built once from a
/// [`CreatePollRequest`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDefinition {
    pub question: String,
    pub options: Vec<PollOption>,
    pub allow_multiple: bool,
    pub anonymous: bool,
    /// 0 means no expiry; the runtime arms no timer.
    pub duration_minutes: u32,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl PollDefinition {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn expires_after(&self) -> Option<Duration> {
        if self.duration_minutes == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.duration_minutes) * 60))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl CreatePollRequest {
    /// Validates the request and produces the immutable definition. Every
    /// rejection carries the full, specific reason.
    pub fn into_definition(self) -> Result<PollDefinition, PollError> {
        let labels: Vec<String> = self
            .options
            .iter()
            .map(|label| label.trim().to_string())
            .collect();

        if labels.len() < MIN_OPTIONS || labels.len() > MAX_OPTIONS {
            return Err(validation_error(format!(
                "option count must be between {} and {}, got {}",
                MIN_OPTIONS,
                MAX_OPTIONS,
                labels.len()
            )));
        }

        let images: Vec<Option<String>> = match &self.images {
            None => vec![None; labels.len()],
            Some(refs) => {
                if refs.len() != labels.len() {
                    return Err(validation_error(format!(
                        "image count ({}) must match option count ({})",
                        refs.len(),
                        labels.len()
                    )));
                }
                refs.iter()
                    .map(|image_ref| {
                        let trimmed = image_ref.trim();
                        if trimmed.is_empty() {
                            return Ok(None);
                        }
                        if !has_image_extension(trimmed) {
                            return Err(validation_error(format!(
                                "invalid image reference '{}': must end with one of .jpg, .jpeg, .png, .gif, .webp",
                                trimmed
                            )));
                        }
                        Ok(Some(trimmed.to_string()))
                    })
                    .collect::<Result<_, PollError>>()?
            }
        };

        let options = labels
            .into_iter()
            .zip(images)
            .map(|(label, image_ref)| PollOption { label, image_ref })
            .collect();

        Ok(PollDefinition {
            question: self.question.trim().to_string(),
            options,
            allow_multiple: self.allow_multiple,
            anonymous: self.anonymous,
            duration_minutes: self.duration_minutes,
            created_by: self.created_by,
        })
    }
}

fn has_image_extension(reference: &str) -> bool {
    let Some((_, extension)) = reference.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
}
