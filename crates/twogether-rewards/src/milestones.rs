//! Journey milestones.
//!
//! Count milestones are derived from the record history and materialized at
//! most once per threshold. Relationship milestones (first date, marriage,
//! ...) are entered by the couple. Both live in one collection, stably
//! sorted by date, and nothing is ever removed from it.

use chrono::NaiveDate;
use uuid::Uuid;

use twogether_types::models::{IntimateRecord, JourneyMilestone, MilestoneType};

pub const INTIMACY_THRESHOLDS: [u32; 7] = [10, 20, 50, 100, 200, 500, 1000];

/// New count milestones for `records`, skipping thresholds already present
/// in `existing`. Returns an empty list when nothing new was crossed.
pub fn synthesize_milestones(
    records: &[IntimateRecord],
    existing: &[JourneyMilestone],
    today: NaiveDate,
) -> Vec<JourneyMilestone> {
    let total = records.len();

    INTIMACY_THRESHOLDS
        .into_iter()
        .filter(|&t| total >= t as usize)
        .filter(|&t| !has_intimacy_milestone(existing, t))
        .map(|t| intimacy_milestone(t, threshold_record(records, t), today))
        .collect()
}

/// Append `new` to `collection`, dropping duplicates, then stably re-sort by
/// date. Returns the milestones actually inserted.
pub fn apply_milestones(
    collection: &mut Vec<JourneyMilestone>,
    new: Vec<JourneyMilestone>,
) -> Vec<JourneyMilestone> {
    let mut inserted = Vec::with_capacity(new.len());
    for milestone in new {
        if is_duplicate(collection, &milestone) {
            continue;
        }
        collection.push(milestone.clone());
        inserted.push(milestone);
    }

    if !inserted.is_empty() {
        collection.sort_by_key(|m| m.date);
    }
    inserted
}

/// A couple-entered milestone. Predefined kinds use the tag as a fixed id so
/// each can exist once; custom ones get a fresh id.
pub fn relationship_milestone(
    kind: MilestoneType,
    date: NaiveDate,
    title: &str,
    description: &str,
) -> JourneyMilestone {
    let id = if kind.is_predefined() {
        kind.as_str().to_string()
    } else {
        Uuid::new_v4().to_string()
    };

    let title = match title.trim() {
        "" => default_title(kind).to_string(),
        t => t.to_string(),
    };

    JourneyMilestone {
        id,
        kind,
        date,
        title,
        description: description.trim().to_string(),
        count: None,
        record_id: None,
    }
}

pub fn default_title(kind: MilestoneType) -> &'static str {
    match kind {
        MilestoneType::Meeting => "The day we met",
        MilestoneType::FirstDate => "Our first date",
        MilestoneType::FirstKiss => "Our first kiss",
        MilestoneType::FirstSex => "Our first night together",
        MilestoneType::Marriage => "Our wedding day",
        MilestoneType::ChildBorn => "Our child was born",
        MilestoneType::IntimacyMilestone => "Intimacy milestone",
        MilestoneType::Custom => "A day to remember",
    }
}

pub fn is_duplicate(collection: &[JourneyMilestone], candidate: &JourneyMilestone) -> bool {
    collection.iter().any(|m| {
        m.id == candidate.id
            || (candidate.kind == MilestoneType::IntimacyMilestone
                && m.kind == MilestoneType::IntimacyMilestone
                && m.count == candidate.count)
    })
}

fn has_intimacy_milestone(existing: &[JourneyMilestone], threshold: u32) -> bool {
    existing
        .iter()
        .any(|m| m.kind == MilestoneType::IntimacyMilestone && m.count == Some(threshold))
}

/// The record that completed `threshold`: the one whose sequence number
/// equals it, or the one at that position if sequence numbers are missing.
fn threshold_record(records: &[IntimateRecord], threshold: u32) -> Option<&IntimateRecord> {
    records
        .iter()
        .find(|r| r.seq == threshold)
        .or_else(|| records.get(threshold as usize - 1))
}

fn intimacy_milestone(
    threshold: u32,
    record: Option<&IntimateRecord>,
    today: NaiveDate,
) -> JourneyMilestone {
    JourneyMilestone {
        id: format!("intimacy_{}", threshold),
        kind: MilestoneType::IntimacyMilestone,
        date: record.map_or(today, |r| r.date),
        title: format!("Intimate moment #{}", threshold),
        description: format!(
            "Congratulations on reaching {} intimate moments together!",
            threshold
        ),
        count: Some(threshold),
        record_id: record.map(|r| r.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{daily_records, record_on};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn counts(milestones: &[JourneyMilestone]) -> Vec<u32> {
        milestones.iter().filter_map(|m| m.count).collect()
    }

    #[test]
    fn nothing_before_first_threshold() {
        let records = daily_records(9, "2024-01-01");
        assert!(synthesize_milestones(&records, &[], today()).is_empty());
    }

    #[test]
    fn tenth_record_materializes_first_milestone() {
        let mut records = daily_records(9, "2024-01-01");
        records.push(record_on(10, "2024-02-20"));

        let new = synthesize_milestones(&records, &[], today());
        assert_eq!(new.len(), 1);
        let m = &new[0];
        assert_eq!(m.id, "intimacy_10");
        assert_eq!(m.kind, MilestoneType::IntimacyMilestone);
        assert_eq!(m.count, Some(10));
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        assert_eq!(m.record_id, Some(records[9].id));
        assert!(m.title.contains("10"));
    }

    #[test]
    fn repeated_synthesis_is_idempotent() {
        let records = daily_records(10, "2024-01-01");
        let mut collection = Vec::new();

        let first = synthesize_milestones(&records, &collection, today());
        apply_milestones(&mut collection, first);
        let second = synthesize_milestones(&records, &collection, today());
        assert!(second.is_empty());
        assert!(apply_milestones(&mut collection, second).is_empty());

        assert_eq!(counts(&collection), vec![10]);
    }

    #[test]
    fn crossing_several_thresholds_at_once() {
        let records = daily_records(55, "2024-01-01");
        let new = synthesize_milestones(&records, &[], today());
        assert_eq!(counts(&new), vec![10, 20, 50]);
        assert_eq!(new[2].date, records[49].date);
    }

    #[test]
    fn existing_threshold_is_never_rematerialized() {
        let records = daily_records(20, "2024-01-01");
        let stale = intimacy_milestone(10, None, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        let new = synthesize_milestones(&records, &[stale], today());
        assert_eq!(counts(&new), vec![20]);
    }

    #[test]
    fn missing_threshold_record_falls_back_to_today() {
        let m = intimacy_milestone(10, None, today());
        assert_eq!(m.date, today());
        assert_eq!(m.record_id, None);
    }

    #[test]
    fn threshold_keyed_by_sequence_number() {
        // Storage order differs from sequence order; the seq wins.
        let mut records = daily_records(10, "2024-01-01");
        records.swap(9, 0);
        let new = synthesize_milestones(&records, &[], today());
        assert_eq!(new[0].record_id, Some(10));
        assert_eq!(new[0].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn collection_sorted_by_date_after_insert() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        let mut collection = vec![
            relationship_milestone(MilestoneType::Meeting, d("2024-01-01"), "", ""),
            relationship_milestone(MilestoneType::FirstKiss, d("2024-03-01"), "", ""),
        ];

        let earlier = relationship_milestone(MilestoneType::FirstDate, d("2023-12-24"), "", "");
        let inserted = apply_milestones(&mut collection, vec![earlier]);
        assert_eq!(inserted.len(), 1);
        let ids: Vec<&str> = collection.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["first_date", "meeting", "first_kiss"]);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let d: NaiveDate = "2024-05-05".parse().unwrap();
        let mut collection = vec![relationship_milestone(MilestoneType::Marriage, d, "", "")];
        let custom = relationship_milestone(MilestoneType::Custom, d, "Honeymoon", "");
        let custom_id = custom.id.clone();
        apply_milestones(&mut collection, vec![custom]);
        assert_eq!(collection[0].id, "marriage");
        assert_eq!(collection[1].id, custom_id);
    }

    #[test]
    fn duplicate_predefined_milestone_is_dropped() {
        let d: NaiveDate = "2024-05-05".parse().unwrap();
        let mut collection = vec![relationship_milestone(MilestoneType::Marriage, d, "", "")];
        let again = relationship_milestone(MilestoneType::Marriage, d, "Again", "");
        assert!(apply_milestones(&mut collection, vec![again]).is_empty());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn blank_title_uses_default() {
        let d: NaiveDate = "2024-05-05".parse().unwrap();
        let m = relationship_milestone(MilestoneType::FirstDate, d, "  ", " dinner ");
        assert_eq!(m.title, "Our first date");
        assert_eq!(m.description, "dinner");
        assert_eq!(m.id, "first_date");
    }
}
