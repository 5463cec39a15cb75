use serde::Serialize;
use serde_json::Value;

use super::Sourced;
use crate::models::{DiabetesType, ServiceStatsPayload};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeShare {
    pub diabetes_type: DiabetesType,
    pub label: &'static str,
    pub users: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// Period-over-period change; the backend does not report it yet.
    pub change: Sourced<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMealRecords {
    pub date: &'static str,
    pub day: &'static str,
    pub records: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatsView {
    pub total_users: u64,
    pub distribution: Vec<TypeShare>,
    pub meal_mean: f64,
    pub calorie_mean: f64,
    pub cards: Vec<StatCard>,
    pub daily_meal_records: Sourced<Vec<DailyMealRecords>>,
}

const fn day(date: &'static str, day: &'static str, records: u64) -> DailyMealRecords {
    DailyMealRecords { date, day, records }
}

fn placeholder_meal_records() -> Vec<DailyMealRecords> {
    vec![
        day("12/09", "화", 559),
        day("12/10", "수", 579),
        day("12/11", "목", 542),
        day("12/12", "금", 531),
        day("12/13", "토", 453),
        day("12/14", "일", 509),
        day("12/15", "월", 621),
    ]
}

/// Thousands separators for card values, e.g. `1,950`.
pub fn group_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let text = format!("{}", rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(&f);
    }
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn from_payload(payload: &Value) -> ServiceStatsView {
    transform(&ServiceStatsPayload::from_value(payload))
}

pub fn transform(stats: &ServiceStatsPayload) -> ServiceStatsView {
    let distribution = vec![
        TypeShare {
            diabetes_type: DiabetesType::Type1,
            label: "1형",
            users: stats.type1,
            color: "#3b82f6",
        },
        TypeShare {
            diabetes_type: DiabetesType::Type2,
            label: "2형",
            users: stats.type2,
            color: "#10b981",
        },
        TypeShare {
            diabetes_type: DiabetesType::Gestational,
            label: "임신성",
            users: stats.gestational,
            color: "#f59e0b",
        },
        TypeShare {
            diabetes_type: DiabetesType::Prediabetic,
            label: "당뇨 전단계",
            users: stats.before,
            color: "#8b5cf6",
        },
    ];
    let total_users: u64 = distribution.iter().map(|t| t.users).sum();

    let cards = vec![
        StatCard {
            label: "총 사용자 수",
            value: total_users.to_string(),
            change: Sourced::placeholder("+5.1%"),
        },
        StatCard {
            label: "하루 평균 식사 기록수",
            value: group_thousands(stats.meal_mean),
            change: Sourced::placeholder("+2.3%"),
        },
        StatCard {
            label: "평균 칼로리",
            value: format!("{} kcal", group_thousands(stats.calorie_mean)),
            change: Sourced::placeholder("-2.1%"),
        },
    ];

    ServiceStatsView {
        total_users,
        distribution,
        meal_mean: stats.meal_mean,
        calorie_mean: stats.calorie_mean,
        cards,
        daily_meal_records: Sourced::placeholder(placeholder_meal_records()),
    }
}
