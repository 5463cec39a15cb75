use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Diabetes classification used as the partition key across statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiabetesType {
    Type1,
    Type2,
    Gestational,
    Prediabetic,
}

impl DiabetesType {
    pub const ALL: [DiabetesType; 4] = [
        DiabetesType::Type1,
        DiabetesType::Type2,
        DiabetesType::Gestational,
        DiabetesType::Prediabetic,
    ];

    /// Parse a backend label. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "1형" | "type1" => Some(DiabetesType::Type1),
            "2형" | "type2" => Some(DiabetesType::Type2),
            "임신성" | "gestational" => Some(DiabetesType::Gestational),
            "전단계" | "당뇨 전단계" | "prediabetes" | "prediabetic" | "before" => {
                Some(DiabetesType::Prediabetic)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiabetesType::Type1 => "1형",
            DiabetesType::Type2 => "2형",
            DiabetesType::Gestational => "임신성",
            DiabetesType::Prediabetic => "전단계",
        }
    }
}

impl std::fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DiabetesType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiabetesType::from_label(s).ok_or_else(|| format!("unknown diabetes type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "남" | "남성" | "남자" | "male" | "m" => Some(Gender::Male),
            "여" | "여성" | "여자" | "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

/// Fixed age ranges used by the allergy and demographic charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Teens,
    Twenties,
    Thirties,
    Forties,
    FiftyPlus,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Teens,
        AgeBand::Twenties,
        AgeBand::Thirties,
        AgeBand::Forties,
        AgeBand::FiftyPlus,
    ];

    /// Ages below 20 (including nonsense negatives) land in the first band.
    pub fn of(age: i64) -> Self {
        match age {
            i64::MIN..=19 => AgeBand::Teens,
            20..=29 => AgeBand::Twenties,
            30..=39 => AgeBand::Thirties,
            40..=49 => AgeBand::Forties,
            _ => AgeBand::FiftyPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Teens => "10-19세",
            AgeBand::Twenties => "20-29세",
            AgeBand::Thirties => "30-39세",
            AgeBand::Forties => "40-49세",
            AgeBand::FiftyPlus => "50세+",
        }
    }
}

/// Where a view-model field group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Derived from the fetched payload.
    Api,
    /// Illustrative constant standing in for a backend field that does not exist yet.
    Placeholder,
}

/// Read a number that may arrive as a JSON number or a numeric string.
pub(crate) fn lenient_f64(val: Option<&Value>) -> Option<f64> {
    val.and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

pub(crate) fn lenient_i64(val: Option<&Value>) -> Option<i64> {
    val.and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// A non-negative count; missing, null or non-numeric values read as 0.
pub(crate) fn lenient_count(val: Option<&Value>) -> u64 {
    lenient_f64(val)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as u64)
        .unwrap_or(0)
}

pub(crate) fn lenient_str(val: Option<&Value>) -> Option<String> {
    val.and_then(|v| v.as_str()).map(String::from)
}

/// Array elements as strings; anything that is not an array reads as empty.
pub(crate) fn string_list(val: Option<&Value>) -> Vec<String> {
    val.and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Split a comma-delimited free-text field, dropping blank entries.
pub fn split_delimited(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// One row of `GET /users/allergy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergyUser {
    pub allergies: Vec<String>,
    pub age: i64,
}

impl AllergyUser {
    pub fn from_value(val: &Value) -> Self {
        Self {
            allergies: string_list(val.get("allergy")),
            age: lenient_i64(val.get("age")).unwrap_or(0),
        }
    }
}

/// A user profile from `GET /users/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    /// Position in the fetched list.
    pub id: usize,
    pub name: String,
    pub email: String,
    pub birth: Option<NaiveDate>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    /// cm
    pub height: Option<f64>,
    /// kg
    pub weight: Option<f64>,
    /// `None` when the user has no diagnosis or the label is not one we know.
    pub diabetes_type: Option<DiabetesType>,
    /// Backend label as sent, for display when it does not parse.
    pub diabetes_type_raw: Option<String>,
    pub allergies: Vec<String>,
    pub preferred_foods: Vec<String>,
    pub disliked_foods: Vec<String>,
    pub activity_level: Option<String>,
    pub target_blood_sugar: Option<f64>,
    pub health_goal: Option<String>,
}

impl UserProfile {
    pub fn from_value(id: usize, val: &Value) -> Self {
        let text = |k: &str| lenient_str(val.get(k));
        let birth = text("birth").and_then(|s| {
            let s = s.trim();
            NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
        });

        let diabetes_raw = text("diabetes_type")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            id,
            name: text("name").unwrap_or_default(),
            email: text("email").unwrap_or_default(),
            birth,
            age: lenient_i64(val.get("age")),
            gender: text("gender").as_deref().and_then(Gender::from_label),
            height: lenient_f64(val.get("height")),
            weight: lenient_f64(val.get("weight")),
            diabetes_type: diabetes_raw.as_deref().and_then(DiabetesType::from_label),
            diabetes_type_raw: diabetes_raw,
            allergies: string_list(val.get("allergy_name")),
            preferred_foods: text("preferred_food")
                .map(|s| split_delimited(&s))
                .unwrap_or_default(),
            // Backend spelling.
            disliked_foods: text("disprefferd_food")
                .map(|s| split_delimited(&s))
                .unwrap_or_default(),
            activity_level: text("activity"),
            target_blood_sugar: lenient_f64(val.get("bs_goal")),
            health_goal: text("health_goal"),
        }
    }

    pub fn diabetes_label(&self) -> &str {
        match (self.diabetes_type, self.diabetes_type_raw.as_deref()) {
            (Some(t), _) => t.label(),
            (None, Some(raw)) => raw,
            (None, None) => "없음",
        }
    }
}

/// `GET /users/service_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceStatsPayload {
    pub type1: u64,
    pub type2: u64,
    pub gestational: u64,
    /// Prediabetic user count.
    pub before: u64,
    pub meal_mean: f64,
    pub calorie_mean: f64,
}

impl ServiceStatsPayload {
    /// Field by field, so one bad value only zeroes itself.
    pub fn from_value(val: &Value) -> Self {
        let mean = |k: &str| {
            lenient_f64(val.get(k))
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };
        Self {
            type1: lenient_count(val.get("type1")),
            type2: lenient_count(val.get("type2")),
            gestational: lenient_count(val.get("gestational")),
            before: lenient_count(val.get("before")),
            meal_mean: mean("meal_mean"),
            calorie_mean: mean("calorie_mean"),
        }
    }
}

/// `GET /reports/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: u64,
    pub waiting: u64,
    /// Completed count.
    pub approval: u64,
}

impl ReportStats {
    pub fn from_value(val: &Value) -> Self {
        Self {
            total: lenient_count(val.get("total")),
            waiting: lenient_count(val.get("waiting")),
            approval: lenient_count(val.get("approval")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Waiting,
    Completed,
    /// Unrecognized label, kept verbatim for display.
    Other(String),
}

impl ReportStatus {
    pub fn label(&self) -> &str {
        match self {
            ReportStatus::Waiting => "대기중",
            ReportStatus::Completed => "처리완료",
            ReportStatus::Other(s) => s,
        }
    }
}

impl From<String> for ReportStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "대기중" | "wait" | "waiting" => ReportStatus::Waiting,
            "처리완료" | "completed" => ReportStatus::Completed,
            _ => ReportStatus::Other(s),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(s: ReportStatus) -> Self {
        s.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Weight,
    BloodSugar,
    Meal,
}

impl ReportCategory {
    pub fn query_value(self) -> &'static str {
        match self {
            ReportCategory::Weight => "weight",
            ReportCategory::BloodSugar => "blood_sugar",
            ReportCategory::Meal => "meal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportCategory::Weight => "체중 관리",
            ReportCategory::BloodSugar => "혈당 관리",
            ReportCategory::Meal => "식단 관리",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        [
            ReportCategory::Weight,
            ReportCategory::BloodSugar,
            ReportCategory::Meal,
        ]
        .into_iter()
        .find(|c| {
            label == c.query_value() || label == c.label() || c.label().starts_with(label)
        })
    }
}

/// One row of `GET /reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub reported_at: Option<String>,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub content: String,
    pub status: ReportStatus,
}

impl ReportRecord {
    pub fn category(&self) -> Option<ReportCategory> {
        ReportCategory::from_label(&self.report_type)
    }

    /// `YYYY-MM-DD HH:MM`, or `-` when the timestamp is missing.
    pub fn display_time(&self) -> String {
        let Some(raw) = self.reported_at.as_deref().map(str::trim) else {
            return "-".to_string();
        };
        if raw.is_empty() {
            return "-".to_string();
        }
        let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_local())
            });
        match parsed {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => raw.replacen('T', " ", 1).chars().take(16).collect(),
        }
    }
}
