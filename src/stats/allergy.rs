use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::{as_rows, percent, round1};
use crate::models::{AgeBand, AllergyUser};

/// Colors for the allergens the app knows by name.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("우유", "#3b82f6"),
    ("땅콩", "#10b981"),
    ("갑각류", "#f59e0b"),
    ("계란", "#ef4444"),
    ("밀", "#8b5cf6"),
    ("콩", "#ec4899"),
    ("생선", "#06b6d4"),
    ("기타", "#6b7280"),
];

/// Cycled through, by first-seen order, for everything else.
const FALLBACK_COLORS: &[&str] = &[
    "#F472B6", "#A78BFA", "#34D399", "#FBBF24", "#60A5FA", "#FB7185", "#818CF8", "#2DD4BF",
    "#A3E635", "#FB923C",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergyEntry {
    pub name: String,
    pub count: u64,
    pub color: &'static str,
    /// Percent of all allergy mentions, one decimal.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBandCount {
    pub band: AgeBand,
    pub label: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergySummary {
    pub total_users: usize,
    /// `-` when nobody reported an allergy.
    pub top_allergy: String,
    pub top_allergy_count: u64,
    pub avg_allergies_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergyStats {
    /// Sorted by count, highest first; ties keep first-seen order.
    pub entries: Vec<AllergyEntry>,
    pub age_bands: Vec<AgeBandCount>,
    pub summary: AllergySummary,
}

pub fn color_for(name: &str, first_seen_index: usize) -> &'static str {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or(FALLBACK_COLORS[first_seen_index % FALLBACK_COLORS.len()])
}

/// Build the view from the raw `GET /users/allergy` payload.
pub fn from_payload(payload: &Value) -> AllergyStats {
    let users: Vec<AllergyUser> = as_rows(payload).iter().map(AllergyUser::from_value).collect();
    transform(&users)
}

pub fn transform(users: &[AllergyUser]) -> AllergyStats {
    // Tally in first-seen order so fallback colors are stable.
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut mentions: u64 = 0;

    for user in users {
        for name in &user.allergies {
            let slot = counts.entry(name.as_str()).or_insert_with(|| {
                order.push(name.as_str());
                0
            });
            *slot += 1;
            mentions += 1;
        }
    }

    let mut entries: Vec<AllergyEntry> = order
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let count = counts[name];
            AllergyEntry {
                name: name.to_string(),
                count,
                color: color_for(name, idx),
                share: percent(count as f64, mentions as f64),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let mut band_counts = [0u64; 5];
    for user in users {
        let band = AgeBand::of(user.age);
        band_counts[band as usize] += 1;
    }
    let age_bands = AgeBand::ALL
        .iter()
        .map(|&band| AgeBandCount {
            band,
            label: band.label(),
            count: band_counts[band as usize],
        })
        .collect();

    let total_users = users.len();
    let (top_allergy, top_allergy_count) = entries
        .first()
        .map(|e| (e.name.clone(), e.count))
        .unwrap_or_else(|| ("-".to_string(), 0));
    let avg_allergies_per_user = if total_users > 0 {
        round1(mentions as f64 / total_users as f64)
    } else {
        0.0
    };

    AllergyStats {
        entries,
        age_bands,
        summary: AllergySummary {
            total_users,
            top_allergy,
            top_allergy_count,
            avg_allergies_per_user,
        },
    }
}
