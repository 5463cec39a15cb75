use std::collections::BTreeMap;

use chrono::Weekday;
use serde::Serialize;
use serde_json::Value;

use super::{as_rows, rate_string, Sourced};
use crate::models::{lenient_f64, lenient_i64, lenient_str, DiabetesType};

/// Daily-mean field for each weekday, spelled the way the backend spells them.
const DAY_FIELDS: [(Weekday, &str, &str, &str); 7] = [
    (Weekday::Mon, "mon_bs_Mean", "월", "월요일"),
    (Weekday::Tue, "tue_bs_Mean", "화", "화요일"),
    (Weekday::Wed, "wen_bs_Mean", "수", "수요일"),
    (Weekday::Thu, "thu_bsMean", "목", "목요일"),
    (Weekday::Fri, "fri_bsMean", "금", "금요일"),
    (Weekday::Sat, "sat_bsMean", "토", "토요일"),
    (Weekday::Sun, "sun_bs_Mean", "일", "일요일"),
];

const NORMAL_MEAN_LIMIT: i64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMean {
    pub day: Weekday,
    pub short_label: &'static str,
    pub long_label: &'static str,
    /// mg/dL; `None` when the backend sent nothing usable.
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloodSugarSummary {
    /// Rounded mean over days with a positive reading.
    pub mean: i64,
    pub high_events: u64,
    pub low_events: u64,
    pub high_rate: String,
    pub low_rate: String,
    /// Measurements in the last 30 days.
    pub total_measurements: u64,
}

impl BloodSugarSummary {
    fn empty() -> Self {
        Self {
            mean: 0,
            high_events: 0,
            low_events: 0,
            high_rate: "0%".to_string(),
            low_rate: "0%".to_string(),
            total_measurements: 0,
        }
    }

    pub fn mean_status(&self) -> &'static str {
        if self.mean <= 0 {
            "-"
        } else if self.mean < NORMAL_MEAN_LIMIT {
            "정상 범위"
        } else {
            "주의 필요"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlySlot {
    pub time: &'static str,
    pub avg: u32,
    pub high: u32,
    pub low: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloodSugarView {
    pub summary: BloodSugarSummary,
    pub weekly: Vec<DailyMean>,
    pub hourly: Sourced<Vec<HourlySlot>>,
}

impl BloodSugarView {
    fn empty() -> Self {
        Self {
            summary: BloodSugarSummary::empty(),
            weekly: Vec::new(),
            hourly: Sourced::placeholder(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BloodSugarStats {
    pub by_type: BTreeMap<DiabetesType, BloodSugarView>,
}

impl BloodSugarStats {
    /// The view for one type, or an all-zero view when the backend had no row for it.
    pub fn view(&self, diabetes_type: DiabetesType) -> BloodSugarView {
        self.by_type
            .get(&diabetes_type)
            .cloned()
            .unwrap_or_else(BloodSugarView::empty)
    }
}

/// Mean of the strictly positive readings, rounded; 0 when there are none.
pub fn positive_mean(readings: &[Option<f64>]) -> i64 {
    let valid: Vec<f64> = readings
        .iter()
        .flatten()
        .copied()
        .filter(|v| *v > 0.0)
        .collect();
    if valid.is_empty() {
        return 0;
    }
    (valid.iter().sum::<f64>() / valid.len() as f64).round() as i64
}

pub fn transform(payload: &Value) -> BloodSugarStats {
    let mut by_type = BTreeMap::new();

    for row in as_rows(payload) {
        let label = lenient_str(row.get("diabetes_type")).unwrap_or_default();
        let Some(diabetes_type) = DiabetesType::from_label(&label) else {
            tracing::debug!(%label, "skipping blood sugar row with unknown type");
            continue;
        };
        by_type.insert(diabetes_type, transform_row(diabetes_type, row));
    }

    BloodSugarStats { by_type }
}

fn transform_row(diabetes_type: DiabetesType, row: &Value) -> BloodSugarView {
    let weekly: Vec<DailyMean> = DAY_FIELDS
        .iter()
        .map(|&(day, field, short_label, long_label)| DailyMean {
            day,
            short_label,
            long_label,
            mean: lenient_f64(row.get(field)),
        })
        .collect();

    let readings: Vec<Option<f64>> = weekly.iter().map(|d| d.mean).collect();
    let count = |k: &str| lenient_i64(row.get(k)).unwrap_or(0).max(0) as u64;

    let high_events = count("high_bs");
    let low_events = count("low_bs");
    let total_measurements = count("count_per_month");

    BloodSugarView {
        summary: BloodSugarSummary {
            mean: positive_mean(&readings),
            high_events,
            low_events,
            high_rate: rate_string(high_events, total_measurements),
            low_rate: rate_string(low_events, total_measurements),
            total_measurements,
        },
        weekly,
        hourly: Sourced::placeholder(hourly_profile(diabetes_type).to_vec()),
    }
}

const fn slot(time: &'static str, avg: u32, high: u32, low: u32) -> HourlySlot {
    HourlySlot {
        time,
        avg,
        high,
        low,
    }
}

/// Illustrative three-hour distribution; the backend has no hourly breakdown yet.
pub fn hourly_profile(diabetes_type: DiabetesType) -> &'static [HourlySlot; 8] {
    match diabetes_type {
        DiabetesType::Type1 => &TYPE1_HOURLY,
        DiabetesType::Type2 => &TYPE2_HOURLY,
        DiabetesType::Gestational => &GESTATIONAL_HOURLY,
        DiabetesType::Prediabetic => &PREDIABETIC_HOURLY,
    }
}

static TYPE1_HOURLY: [HourlySlot; 8] = [
    slot("00-03시", 139, 0, 0),
    slot("03-06시", 145, 0, 0),
    slot("06-09시", 151, 0, 0),
    slot("09-12시", 152, 0, 0),
    slot("12-15시", 153, 0, 0),
    slot("15-18시", 148, 0, 0),
    slot("18-21시", 146, 0, 0),
    slot("21-24시", 142, 0, 0),
];

static TYPE2_HOURLY: [HourlySlot; 8] = [
    slot("00-03시", 148, 7, 0),
    slot("03-06시", 145, 3, 0),
    slot("06-09시", 156, 23, 0),
    slot("09-12시", 160, 64, 0),
    slot("12-15시", 165, 102, 0),
    slot("15-18시", 164, 74, 0),
    slot("18-21시", 157, 59, 0),
    slot("21-24시", 153, 12, 0),
];

static GESTATIONAL_HOURLY: [HourlySlot; 8] = [
    slot("00-03시", 155, 2, 0),
    slot("03-06시", 153, 0, 0),
    slot("06-09시", 160, 2, 0),
    slot("09-12시", 163, 6, 0),
    slot("12-15시", 168, 18, 0),
    slot("15-18시", 163, 13, 0),
    slot("18-21시", 161, 4, 0),
    slot("21-24시", 157, 3, 0),
];

static PREDIABETIC_HOURLY: [HourlySlot; 8] = [
    slot("00-03시", 148, 4, 0),
    slot("03-06시", 147, 1, 0),
    slot("06-09시", 156, 20, 0),
    slot("09-12시", 155, 19, 0),
    slot("12-15시", 160, 38, 0),
    slot("15-18시", 157, 22, 0),
    slot("18-21시", 155, 19, 0),
    slot("21-24시", 154, 12, 0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mean_skips_non_positive_days() {
        assert_eq!(positive_mean(&[Some(100.0), Some(0.0), Some(120.0)]), 110);
        assert_eq!(positive_mean(&[Some(100.0), None, Some(-5.0)]), 100);
        assert_eq!(positive_mean(&[None, Some(0.0)]), 0);
    }

    #[test]
    fn maps_irregular_day_fields() {
        let stats = transform(&json!([{
            "diabetes_type": "2형",
            "mon_bs_Mean": 140,
            "tue_bs_Mean": 0,
            "wen_bs_Mean": 150,
            "thu_bsMean": "160",
            "fri_bsMean": null,
            "sat_bsMean": 130,
            "sun_bs_Mean": 120,
            "high_bs": 12,
            "low_bs": 6,
            "count_per_month": 240
        }]));

        let view = stats.view(DiabetesType::Type2);
        let means: Vec<_> = view.weekly.iter().map(|d| d.mean).collect();
        assert_eq!(
            means,
            vec![Some(140.0), Some(0.0), Some(150.0), Some(160.0), None, Some(130.0), Some(120.0)]
        );
        assert_eq!(view.weekly[2].day, Weekday::Wed);
        assert_eq!(view.weekly[3].long_label, "목요일");
        assert_eq!(view.summary.mean, 140);
        assert_eq!(view.summary.high_rate, "5.0%");
        assert_eq!(view.summary.low_rate, "2.5%");
        assert_eq!(view.summary.mean_status(), "주의 필요");
        assert!(view.hourly.is_placeholder());
        assert_eq!(view.hourly.value[4].high, 102);
    }

    #[test]
    fn zero_measurements_keep_rates_finite() {
        let stats = transform(&json!([{
            "diabetes_type": "1형",
            "high_bs": 2,
            "low_bs": 0,
            "count_per_month": 0
        }]));
        let view = stats.view(DiabetesType::Type1);
        assert_eq!(view.summary.high_rate, "200.0%");
        assert_eq!(view.summary.low_rate, "0.0%");
        assert_eq!(view.summary.mean, 0);
        assert_eq!(view.summary.mean_status(), "-");
    }

    #[test]
    fn missing_type_reads_as_empty_view() {
        let stats = transform(&json!([{ "diabetes_type": "기타" }]));
        assert!(stats.by_type.is_empty());
        let view = stats.view(DiabetesType::Gestational);
        assert_eq!(view.summary.total_measurements, 0);
        assert!(view.weekly.is_empty());
    }
}
