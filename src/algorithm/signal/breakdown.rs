//! Stratified breakdowns of report counts

use serde::{Deserialize, Serialize};

use crate::config::Vocabularies;
use crate::error::Result;
use crate::filter::ReportFilter;
use crate::models::report::AGE_BUCKET_YEARS;
use crate::store::{GroupCount, GroupField, GroupKey, ReportStore};

/// Count of reports sharing one stratum value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Stratum code; `None` only for reports without a race
    pub key: Option<u32>,
    /// Human-readable stratum label
    pub label: String,
    /// Number of reports in the stratum
    pub count: u64,
}

/// Counts of a combination's reports split by each demographic attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// Counts per symptom
    pub symptom: Vec<Bucket>,
    /// Counts per age decade
    pub age: Vec<Bucket>,
    /// Counts per gender
    pub gender: Vec<Bucket>,
    /// Counts per race
    pub race: Vec<Bucket>,
}

/// Sort groups by count descending, ties by ascending key
pub fn rank_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

/// Fetch the groups of `field` under `filter`, ranked
pub async fn ranked_groups(
    store: &dyn ReportStore,
    field: GroupField,
    filter: &ReportFilter,
) -> Result<Vec<GroupCount>> {
    let mut groups = store.group_by(field, filter).await?;
    rank_groups(&mut groups);
    Ok(groups)
}

/// Label ranked groups using the vocabularies
#[must_use]
pub fn to_buckets(groups: Vec<GroupCount>, vocabularies: &Vocabularies) -> Vec<Bucket> {
    groups
        .into_iter()
        .filter_map(|group| {
            let (key, label) = match group.key {
                GroupKey::Symptom(code) => (Some(code), vocabularies.symptom_label(code)),
                GroupKey::Gender(code) => (Some(code), vocabularies.gender_label(code)),
                GroupKey::Race(code) => (code, vocabularies.race_label(code)),
                GroupKey::Age(bucket) => (Some(bucket), age_label(bucket)),
                GroupKey::Combination(_) => return None,
            };
            Some(Bucket {
                key,
                label,
                count: group.count,
            })
        })
        .collect()
}

/// Label of an age decade bucket, e.g. `40-49`
#[must_use]
pub fn age_label(bucket: u32) -> String {
    let start = bucket.saturating_mul(AGE_BUCKET_YEARS);
    format!("{}-{}", start, start.saturating_add(AGE_BUCKET_YEARS - 1))
}
