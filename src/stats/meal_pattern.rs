use serde::Serialize;

use super::{percent, Sourced};
use crate::models::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    /// 0..=23
    pub hour: u8,
    pub count: u64,
}

impl HourlyCount {
    pub fn label(&self) -> String {
        format!("{:02}시", self.hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealPatternInput {
    pub source: DataSource,
    /// Records over the last 30 days.
    pub total_records: u64,
    pub hourly: Vec<HourlyCount>,
    pub monthly: Vec<MonthlyTotal>,
}

impl MealPatternInput {
    /// Illustrative figures shown until the backend exposes meal-time statistics.
    pub fn placeholder() -> Self {
        const HOURLY: [u64; 24] = [
            3, 2, 0, 1, 0, 1, 5, 8, 18, 17, 9, 29, 46, 43, 28, 16, 12, 12, 31, 29, 25, 8, 6, 3,
        ];
        const MONTHLY: [(&str, u64); 6] = [
            ("5월", 2811),
            ("6월", 3110),
            ("7월", 4920),
            ("8월", 5702),
            ("9월", 6211),
            ("10월", 6543),
        ];

        Self {
            source: DataSource::Placeholder,
            total_records: 7551,
            hourly: HOURLY
                .iter()
                .enumerate()
                .map(|(hour, &count)| HourlyCount {
                    hour: hour as u8,
                    count,
                })
                .collect(),
            monthly: MONTHLY
                .iter()
                .map(|&(month, total)| MonthlyTotal {
                    month: month.to_string(),
                    total,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPatternSummary {
    pub total_records: u64,
    /// Earliest hour among those with the highest count.
    pub peak_hour: Option<HourlyCount>,
    /// Last month against the one before, percent; `None` with fewer than two months.
    pub monthly_growth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPatternView {
    pub summary: Sourced<MealPatternSummary>,
    pub hourly: Vec<HourlyCount>,
    pub monthly: Vec<MonthlyTotal>,
}

pub fn peak_hour(hourly: &[HourlyCount]) -> Option<HourlyCount> {
    hourly
        .iter()
        .copied()
        .fold(None, |best: Option<HourlyCount>, h| match best {
            Some(b) if b.count >= h.count => Some(b),
            _ => Some(h),
        })
}

pub fn monthly_growth(monthly: &[MonthlyTotal]) -> Option<f64> {
    match monthly {
        [.., prev, last] if prev.total > 0 => Some(percent(
            last.total as f64 - prev.total as f64,
            prev.total as f64,
        )),
        _ => None,
    }
}

pub fn transform(input: MealPatternInput) -> MealPatternView {
    let summary = MealPatternSummary {
        total_records: input.total_records,
        peak_hour: peak_hour(&input.hourly),
        monthly_growth: monthly_growth(&input.monthly),
    };

    MealPatternView {
        summary: Sourced {
            source: input.source,
            value: summary,
        },
        hourly: input.hourly,
        monthly: input.monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_peak_and_growth() {
        let view = transform(MealPatternInput::placeholder());
        let peak = view.summary.value.peak_hour.unwrap();
        assert_eq!(peak.hour, 12);
        assert_eq!(peak.count, 46);
        assert_eq!(peak.label(), "12시");
        assert_eq!(view.summary.value.monthly_growth, Some(5.3));
        assert_eq!(view.hourly.len(), 24);
        assert!(view.summary.is_placeholder());
    }

    #[test]
    fn ties_keep_earliest_hour() {
        let hourly = [
            HourlyCount { hour: 7, count: 5 },
            HourlyCount { hour: 8, count: 9 },
            HourlyCount { hour: 19, count: 9 },
        ];
        assert_eq!(peak_hour(&hourly).map(|h| h.hour), Some(8));
        assert_eq!(peak_hour(&[]), None);
    }

    #[test]
    fn growth_needs_two_months() {
        let one = [MonthlyTotal {
            month: "1월".into(),
            total: 10,
        }];
        assert_eq!(monthly_growth(&one), None);

        let falling = [
            MonthlyTotal {
                month: "1월".into(),
                total: 200,
            },
            MonthlyTotal {
                month: "2월".into(),
                total: 150,
            },
        ];
        assert_eq!(monthly_growth(&falling), Some(-25.0));
    }
}
