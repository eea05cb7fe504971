use serde::{Deserialize, Serialize};

use crate::{
    definition::PollDefinition,
    ledger::{LedgerSnapshot, VOTER_SAMPLE_SIZE},
};

pub const LIVE_COLOR: &str = "#00AAFF";
pub const ENDED_COLOR: &str = "#808080";

const BAR_WIDTH: u32 = 10;
const BAR_FILLED: char = '■';
const BAR_EMPTY: char = '□';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
}

/// Platform-neutral rendered poll state. Pushing it to the render sink
/// replaces the previous payload wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<DisplayField>,
    /// First option's image, when it has one.
    #[serde(default)]
    pub image: Option<String>,
    /// Images of the remaining options, in option order.
    #[serde(default)]
    pub extra_images: Vec<String>,
    pub footer: String,
    pub ended: bool,
}

/// Projects a live poll. Pure and deterministic: the same definition and
/// snapshot always yield a byte-identical payload.
pub fn project(definition: &PollDefinition, snapshot: &LedgerSnapshot) -> DisplayPayload {
    render(definition, snapshot, false)
}

/// Final render after close: muted color, `[ENDED]` title marker.
pub fn project_ended(definition: &PollDefinition, snapshot: &LedgerSnapshot) -> DisplayPayload {
    render(definition, snapshot, true)
}

fn render(definition: &PollDefinition, snapshot: &LedgerSnapshot, ended: bool) -> DisplayPayload {
    let title = if ended {
        format!("📊 [ENDED] {}", definition.question)
    } else {
        format!("📊 {}", definition.question)
    };

    let description = definition
        .allow_multiple
        .then(|| "*Multiple choices allowed*".to_string());

    let mut image = None;
    let mut extra_images = Vec::new();
    let mut fields = Vec::with_capacity(definition.options.len());

    for (index, (option, votes)) in definition
        .options
        .iter()
        .zip(snapshot.options.iter())
        .enumerate()
    {
        let percentage = if snapshot.total > 0 {
            votes.count as f64 / snapshot.total as f64 * 100.0
        } else {
            0.0
        };

        let mut value = format!(
            "{}\n{} {:.1}% ({})",
            option.label,
            progress_bar(percentage),
            percentage,
            votes.count
        );

        if !definition.anonymous && votes.count > 0 {
            let voters = votes.sampled_voters.join(", ");
            if votes.count > VOTER_SAMPLE_SIZE {
                value.push_str(&format!("\nVoters: {}...", voters));
            } else {
                value.push_str(&format!("\nVoters: {}", voters));
            }
        }

        if let Some(image_ref) = &option.image_ref {
            if index == 0 {
                image = Some(image_ref.clone());
                value.push_str("\n[Image Above]");
            } else {
                extra_images.push(image_ref.clone());
                value.push_str("\n[See Image Below]");
            }
        }

        fields.push(DisplayField {
            name: format!("Option {}", index + 1),
            value,
        });
    }

    let duration_text = if definition.duration_minutes > 0 {
        format!("Ends in {}min", definition.duration_minutes)
    } else {
        "No time limit".to_string()
    };
    let footer = match &definition.created_by {
        Some(creator) => format!("Created by {} • {}", creator, duration_text),
        None => duration_text,
    };

    DisplayPayload {
        title,
        color: if ended { ENDED_COLOR } else { LIVE_COLOR }.to_string(),
        description,
        fields,
        image,
        extra_images,
        footer,
        ended,
    }
}

// round, not floor: 15% must fill 2 of 10 units.
fn progress_bar(percentage: f64) -> String {
    let filled = (percentage / 10.0).round() as u32;
    let filled = filled.min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    let mut bar = String::with_capacity(BAR_WIDTH as usize * BAR_FILLED.len_utf8());
    for _ in 0..filled {
        bar.push(BAR_FILLED);
    }
    for _ in 0..empty {
        bar.push(BAR_EMPTY);
    }
    bar
}
