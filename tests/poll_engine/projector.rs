use hustings::{
    LedgerSnapshot, OptionSnapshot, project, project_ended,
    projector::{ENDED_COLOR, LIVE_COLOR},
};

use crate::definition;

fn snapshot(counts: &[usize], voters: &[&[&str]]) -> LedgerSnapshot {
    LedgerSnapshot {
        total: counts.iter().sum(),
        options: counts
            .iter()
            .zip(voters.iter())
            .map(|(count, sampled)| OptionSnapshot {
                count: *count,
                sampled_voters: sampled.iter().map(|voter| voter.to_string()).collect(),
            })
            .collect(),
    }
}

#[test]
fn given_same_snapshot_when_projected_twice_then_output_is_byte_identical() {
    let definition = definition(&["A", "B"], false, false);
    let snapshot = snapshot(&[2, 1], &[&["ada", "bob"], &["cyd"]]);

    let first = serde_json::to_string(&project(&definition, &snapshot)).expect("serialize");
    let second = serde_json::to_string(&project(&definition, &snapshot)).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn given_fifteen_percent_then_bar_rounds_half_up_to_two_units() {
    let definition = definition(&["A", "B"], false, true);
    // 3 of 20 votes: exactly 15%.
    let snapshot = snapshot(&[3, 17], &[&[], &[]]);

    let payload = project(&definition, &snapshot);
    assert!(
        payload.fields[0].value.contains("■■□□□□□□□□ 15.0% (3)"),
        "unexpected field: {}",
        payload.fields[0].value
    );
}

#[test]
fn given_no_votes_then_every_option_renders_zero_percent() {
    let definition = definition(&["A", "B"], false, false);
    let snapshot = snapshot(&[0, 0], &[&[], &[]]);

    let payload = project(&definition, &snapshot);
    for field in &payload.fields {
        assert!(
            field.value.contains("□□□□□□□□□□ 0.0% (0)"),
            "unexpected field: {}",
            field.value
        );
    }
}

#[test]
fn given_anonymous_poll_then_no_voter_identities_are_listed() {
    let definition = definition(&["A", "B"], false, true);
    let snapshot = snapshot(&[4, 0], &[&["ada", "bob", "cyd"], &[]]);

    let payload = project(&definition, &snapshot);
    assert!(!payload.fields[0].value.contains("Voters:"));
    assert!(payload.fields[0].value.contains("100.0% (4)"));
}

#[test]
fn given_more_voters_than_sample_then_listing_is_truncated() {
    let definition = definition(&["A", "B"], false, false);
    let over = snapshot(&[4, 0], &[&["ada", "bob", "cyd"], &[]]);
    let under = snapshot(&[2, 0], &[&["ada", "bob"], &[]]);

    let payload = project(&definition, &over);
    assert!(payload.fields[0].value.contains("Voters: ada, bob, cyd..."));

    let payload = project(&definition, &under);
    assert!(payload.fields[0].value.contains("Voters: ada, bob"));
    assert!(!payload.fields[0].value.contains("..."));
}

#[test]
fn given_ended_projection_then_payload_is_visually_distinguished() {
    let definition = definition(&["A", "B"], false, false);
    let snapshot = snapshot(&[1, 0], &[&["ada"], &[]]);

    let live = project(&definition, &snapshot);
    assert!(live.title.starts_with("📊 "));
    assert!(!live.title.contains("[ENDED]"));
    assert_eq!(live.color, LIVE_COLOR);
    assert!(!live.ended);

    let ended = project_ended(&definition, &snapshot);
    assert!(ended.title.contains("[ENDED]"));
    assert_eq!(ended.color, ENDED_COLOR);
    assert!(ended.ended);
}

#[test]
fn given_multiple_choice_then_description_says_so() {
    let snapshot = snapshot(&[0, 0], &[&[], &[]]);

    let multi = project(&definition(&["A", "B"], true, false), &snapshot);
    assert_eq!(
        multi.description.as_deref(),
        Some("*Multiple choices allowed*")
    );

    let single = project(&definition(&["A", "B"], false, false), &snapshot);
    assert!(single.description.is_none());
}

#[test]
fn given_option_images_then_first_is_primary_and_rest_are_extra() {
    let mut definition = definition(&["A", "B", "C"], false, false);
    definition.options[0].image_ref = Some("https://img.example/a.png".to_string());
    definition.options[2].image_ref = Some("https://img.example/c.gif".to_string());
    let snapshot = snapshot(&[0, 0, 0], &[&[], &[], &[]]);

    let payload = project(&definition, &snapshot);
    assert_eq!(
        payload.image.as_deref(),
        Some("https://img.example/a.png")
    );
    assert_eq!(
        payload.extra_images,
        vec!["https://img.example/c.gif".to_string()]
    );
    assert!(payload.fields[0].value.contains("[Image Above]"));
    assert!(payload.fields[2].value.contains("[See Image Below]"));
    assert!(!payload.fields[1].value.contains("Image"));
}

#[test]
fn given_duration_and_creator_then_footer_reflects_both() {
    let snapshot = snapshot(&[0, 0], &[&[], &[]]);

    let mut timed = definition(&["A", "B"], false, false);
    timed.duration_minutes = 5;
    assert_eq!(
        project(&timed, &snapshot).footer,
        "Created by quizmaster • Ends in 5min"
    );

    let unbounded = definition(&["A", "B"], false, false);
    assert_eq!(
        project(&unbounded, &snapshot).footer,
        "Created by quizmaster • No time limit"
    );

    let mut anonymous_creator = definition(&["A", "B"], false, false);
    anonymous_creator.created_by = None;
    assert_eq!(project(&anonymous_creator, &snapshot).footer, "No time limit");
}

#[test]
fn given_two_thirds_split_then_percentages_stay_in_bounds() {
    let definition = definition(&["A", "B"], true, true);
    let snapshot = snapshot(&[1, 2], &[&[], &[]]);

    let payload = project(&definition, &snapshot);
    assert!(payload.fields[0].value.contains("33.3% (1)"));
    assert!(payload.fields[1].value.contains("66.7% (2)"));
}

#[test]
fn given_unlabeled_helper_then_option_names_are_one_based() {
    let definition = definition(&["first", "second"], false, false);
    let snapshot = snapshot(&[0, 0], &[&[], &[]]);

    let payload = project(&definition, &snapshot);
    assert_eq!(payload.fields[0].name, "Option 1");
    assert_eq!(payload.fields[1].name, "Option 2");
    assert!(payload.fields[0].value.starts_with("first\n"));
}
