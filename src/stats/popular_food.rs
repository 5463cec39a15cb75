use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{as_rows, Sourced};
use crate::models::{lenient_f64, lenient_i64, DiabetesType};

pub const MAX_RECORDED: usize = 10;
pub const MAX_FAVORITES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedFood {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodSummary {
    pub total_records: u64,
    pub top_food: String,
    pub top_count: u64,
    pub favorite_food: String,
    /// Display-only recommendation adoption rate.
    pub adoption_rate: Sourced<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodTypeView {
    pub summary: FoodSummary,
    /// Up to ten, in the backend's rank order.
    pub recorded: Vec<RankedFood>,
    /// Up to five, in the backend's rank order.
    pub favorites: Vec<RankedFood>,
}

impl Default for FoodTypeView {
    fn default() -> Self {
        Self {
            summary: FoodSummary {
                total_records: 0,
                top_food: "-".to_string(),
                top_count: 0,
                favorite_food: "-".to_string(),
                adoption_rate: Sourced::placeholder("-".to_string()),
            },
            recorded: Vec::new(),
            favorites: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularFoodStats {
    /// Always holds all four types; only built through `default()` and `transform`.
    by_type: BTreeMap<DiabetesType, FoodTypeView>,
}

impl PopularFoodStats {
    pub fn view(&self, diabetes_type: DiabetesType) -> &FoodTypeView {
        &self.by_type[&diabetes_type]
    }

    pub fn views(&self) -> impl Iterator<Item = (DiabetesType, &FoodTypeView)> {
        self.by_type.iter().map(|(t, v)| (*t, v))
    }
}

impl Default for PopularFoodStats {
    fn default() -> Self {
        Self {
            by_type: DiabetesType::ALL
                .iter()
                .map(|&t| (t, FoodTypeView::default()))
                .collect(),
        }
    }
}

fn adoption_rate(diabetes_type: DiabetesType) -> &'static str {
    match diabetes_type {
        DiabetesType::Type1 => "95.1%",
        DiabetesType::Type2 => "91.5%",
        DiabetesType::Gestational => "93.0%",
        DiabetesType::Prediabetic => "95.4%",
    }
}

/// A `[name, count]` tuple; anything shorter or not an array is ignored.
fn ranked_pair(val: Option<&Value>) -> Option<RankedFood> {
    let arr = val?.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    let name = match &arr[0] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let count = lenient_i64(Some(&arr[1])).unwrap_or(0).max(0) as u64;
    Some(RankedFood { name, count })
}

/// First present key among the alternatives the backend has used.
fn first_of<'a>(row: &'a Value, keys: &[String]) -> Option<&'a Value> {
    keys.iter().find_map(|k| row.get(k).filter(|v| !v.is_null()))
}

fn row_type(row: &Value, keys: &[&str]) -> Option<DiabetesType> {
    keys.iter()
        .find_map(|k| row.get(*k).and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
        .and_then(DiabetesType::from_label)
}

/// Merge `GET /foods/history` and `GET /foods/favorite` payloads.
pub fn transform(history: &Value, favorites: &Value) -> PopularFoodStats {
    let mut stats = PopularFoodStats::default();

    for row in as_rows(history) {
        let Some(diabetes_type) = row_type(row, &["diabetes_type"]) else {
            continue;
        };
        let recorded: Vec<RankedFood> = (1..=MAX_RECORDED)
            .filter_map(|i| ranked_pair(row.get(format!("record_top_{i}"))))
            .collect();

        let view = stats.by_type.entry(diabetes_type).or_default();
        if let Some(top) = recorded.first() {
            view.summary.top_food = top.name.clone();
            view.summary.top_count = top.count;
        } else {
            view.summary.top_food = "-".to_string();
            view.summary.top_count = 0;
        }
        view.summary.total_records = lenient_f64(row.get("food_record"))
            .map(|v| v.max(0.0) as u64)
            .unwrap_or(0);
        view.summary.adoption_rate = Sourced::placeholder(adoption_rate(diabetes_type).to_string());
        view.recorded = recorded;
    }

    for row in as_rows(favorites) {
        let Some(diabetes_type) = row_type(row, &["diabetesType", "diabetes_type"]) else {
            continue;
        };
        let keys_for = |i: usize| [format!("favoriteTop{i}"), format!("favorite_top_{i}")];

        let view = stats.by_type.entry(diabetes_type).or_default();
        if let Some(name) = first_of(row, &keys_for(1))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
        {
            view.summary.favorite_food = match name {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
        view.favorites = (1..=MAX_FAVORITES)
            .filter_map(|i| ranked_pair(first_of(row, &keys_for(i))))
            .collect();
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merges_history_and_favorites() {
        let history = json!([{
            "diabetes_type": " 2형 ",
            "food_record": 15234,
            "record_top_1": ["현미밥", 812],
            "record_top_2": ["닭가슴살", 640],
            "record_top_3": ["broken"],
            "record_top_4": ["두부", "300"]
        }]);
        let favorites = json!([
            {
                "diabetesType": "2형",
                "favoriteTop1": ["그릭요거트", 120],
                "favorite_top_2": ["견과류", 80]
            },
            { "diabetes_type": "1형", "favorite_top_1": ["바나나", 9] }
        ]);

        let stats = transform(&history, &favorites);
        let t2 = stats.view(DiabetesType::Type2);
        assert_eq!(t2.summary.total_records, 15234);
        assert_eq!(t2.summary.top_food, "현미밥");
        assert_eq!(t2.summary.top_count, 812);
        assert_eq!(t2.summary.adoption_rate.value, "91.5%");
        assert!(t2.summary.adoption_rate.is_placeholder());
        let recorded: Vec<_> = t2.recorded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(recorded, vec!["현미밥", "닭가슴살", "두부"]);
        assert_eq!(t2.recorded[2].count, 300);

        assert_eq!(t2.summary.favorite_food, "그릭요거트");
        assert_eq!(t2.favorites.len(), 2);

        let t1 = stats.view(DiabetesType::Type1);
        assert_eq!(t1.summary.favorite_food, "바나나");
        assert!(t1.recorded.is_empty());
        assert_eq!(t1.summary.top_food, "-");
    }

    #[test]
    fn unknown_types_are_dropped_and_missing_types_default() {
        let stats = transform(
            &json!([{ "diabetes_type": "3형", "record_top_1": ["사과", 1] }]),
            &json!("not an array"),
        );
        let types: Vec<DiabetesType> = stats.views().map(|(t, _)| t).collect();
        assert_eq!(types, DiabetesType::ALL.to_vec());
        for t in DiabetesType::ALL {
            assert_eq!(stats.view(t), &FoodTypeView::default());
        }
    }

    #[test]
    fn caps_ranked_lists() {
        let mut row = serde_json::Map::new();
        row.insert("diabetes_type".into(), json!("임신성"));
        for i in 1..=12 {
            row.insert(format!("record_top_{i}"), json!([format!("food{i}"), 100 - i]));
        }
        let mut fav = serde_json::Map::new();
        fav.insert("diabetes_type".into(), json!("임신성"));
        for i in 1..=7 {
            fav.insert(format!("favorite_top_{i}"), json!([format!("fav{i}"), 10 - i]));
        }
        let stats = transform(&json!([row]), &json!([fav]));
        let view = stats.view(DiabetesType::Gestational);
        assert_eq!(view.recorded.len(), MAX_RECORDED);
        assert_eq!(view.favorites.len(), MAX_FAVORITES);
    }
}
