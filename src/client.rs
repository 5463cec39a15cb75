use serde_json::Value;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::gateway::Gateway;
use crate::lists::{Acknowledgement, CompletionOutcome, ReportBoard, ReportQuery, UserDirectory};
use crate::models::*;
use crate::stats::{
    allergy, allergy::AllergyStats, as_rows, blood_sugar, blood_sugar::BloodSugarStats,
    popular_food, popular_food::PopularFoodStats, service, service::ServiceStatsView,
};

const ALLERGY_PATH: &str = "users/allergy";
const BLOOD_SUGAR_PATH: &str = "blood_sugar";
const FOOD_HISTORY_PATH: &str = "foods/history";
const FOOD_FAVORITE_PATH: &str = "foods/favorite";
const SERVICE_STATS_PATH: &str = "users/service_stats";
const USER_LIST_PATH: &str = "users/list";
const REPORT_STATS_PATH: &str = "reports/stats";
const REPORTS_PATH: &str = "reports";

/// Typed access to every dashboard endpoint.
///
/// The `get_*` methods return payloads and fail on `success: false`. The `load_*`
/// methods build view-models and return `Ok(None)` when the server rejected the
/// request, so the caller can show a "data unavailable" state.
#[derive(Clone)]
pub struct DashboardClient {
    gateway: Gateway,
}

impl DashboardClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            gateway: Gateway::new(config)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        self.gateway.base_url()
    }

    /// GET `path` and unwrap the envelope. A `null` or absent payload reads as `Null`.
    async fn fetch_data(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let envelope = self.gateway.get(path, query).await?;
        match envelope.into_data() {
            Ok(data) => Ok(data.unwrap_or(Value::Null)),
            Err(err) => {
                tracing::warn!(path, error = %err, "server returned a non-success envelope");
                Err(err)
            }
        }
    }

    pub async fn get_allergy_users(&self) -> Result<Vec<AllergyUser>> {
        let data = self.fetch_data(ALLERGY_PATH, &[]).await?;
        Ok(as_rows(&data).iter().map(AllergyUser::from_value).collect())
    }

    pub async fn get_blood_sugar(&self) -> Result<Value> {
        self.fetch_data(BLOOD_SUGAR_PATH, &[]).await
    }

    pub async fn get_food_history(&self) -> Result<Value> {
        self.fetch_data(FOOD_HISTORY_PATH, &[]).await
    }

    pub async fn get_food_favorites(&self) -> Result<Value> {
        self.fetch_data(FOOD_FAVORITE_PATH, &[]).await
    }

    pub async fn get_service_stats(&self) -> Result<ServiceStatsPayload> {
        let data = self.fetch_data(SERVICE_STATS_PATH, &[]).await?;
        Ok(ServiceStatsPayload::from_value(&data))
    }

    pub async fn get_users(&self) -> Result<Vec<UserProfile>> {
        let data = self.fetch_data(USER_LIST_PATH, &[]).await?;
        Ok(UserDirectory::from_payload(&data).users().to_vec())
    }

    pub async fn get_report_stats(&self) -> Result<ReportStats> {
        let data = self.fetch_data(REPORT_STATS_PATH, &[]).await?;
        Ok(ReportStats::from_value(&data))
    }

    /// Reports matching `query`. Rows that do not decode are skipped.
    pub async fn get_reports(&self, query: &ReportQuery) -> Result<Vec<ReportRecord>> {
        let data = self.fetch_data(REPORTS_PATH, &query.params()).await?;
        let reports = as_rows(&data)
            .iter()
            .filter_map(|row| match serde_json::from_value::<ReportRecord>(row.clone()) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed report row");
                    None
                }
            })
            .collect();
        Ok(reports)
    }

    /// Ask the server to mark report `id` completed.
    ///
    /// A refusal (e.g. the report was already handled) comes back as
    /// `success: false` with the server's message, not as an error.
    pub async fn complete_report(&self, id: i64) -> Result<Acknowledgement> {
        let id_param = id.to_string();
        let envelope = self
            .gateway
            .patch(REPORTS_PATH, &[("id", id_param.as_str())])
            .await?;
        Ok(Acknowledgement {
            success: envelope.success,
            message: envelope.message.unwrap_or_default(),
        })
    }

    pub async fn load_service_stats(&self) -> Result<Option<ServiceStatsView>> {
        let data = self.fetch_data(SERVICE_STATS_PATH, &[]).await;
        Ok(rejected_as_none(data)?.map(|d| service::from_payload(&d)))
    }

    pub async fn load_allergy_stats(&self) -> Result<Option<AllergyStats>> {
        let data = self.fetch_data(ALLERGY_PATH, &[]).await;
        Ok(rejected_as_none(data)?.map(|d| allergy::from_payload(&d)))
    }

    pub async fn load_blood_sugar_stats(&self) -> Result<Option<BloodSugarStats>> {
        let data = self.fetch_data(BLOOD_SUGAR_PATH, &[]).await;
        Ok(rejected_as_none(data)?.map(|d| blood_sugar::transform(&d)))
    }

    /// Fetch history and favorites together. A transport failure on either side
    /// fails the whole view; a rejected side contributes nothing.
    pub async fn load_popular_food_stats(&self) -> Result<PopularFoodStats> {
        let (history, favorites) = tokio::join!(
            self.fetch_data(FOOD_HISTORY_PATH, &[]),
            self.fetch_data(FOOD_FAVORITE_PATH, &[]),
        );
        let history = rejected_as_none(history)?.unwrap_or(Value::Null);
        let favorites = rejected_as_none(favorites)?.unwrap_or(Value::Null);
        Ok(popular_food::transform(&history, &favorites))
    }

    pub async fn load_user_directory(&self) -> Result<Option<UserDirectory>> {
        let data = self.fetch_data(USER_LIST_PATH, &[]).await;
        Ok(rejected_as_none(data)?.map(|d| UserDirectory::from_payload(&d)))
    }

    /// Re-fetch the list for the board's current filters, replacing local state.
    pub async fn refresh_reports(&self, board: &mut ReportBoard) -> Result<()> {
        let reports = self.get_reports(&board.query()).await?;
        tracing::debug!(count = reports.len(), query = ?board.query(), "reports fetched");
        board.replace_reports(reports);
        Ok(())
    }

    pub async fn refresh_report_stats(&self, board: &mut ReportBoard) -> Result<()> {
        let stats = self.get_report_stats().await?;
        board.set_stats(stats);
        Ok(())
    }

    /// Complete a report and, once the server acknowledges, update the board.
    /// On a transport error the board is left untouched.
    pub async fn complete_report_on(
        &self,
        board: &mut ReportBoard,
        id: i64,
    ) -> Result<CompletionOutcome> {
        let ack = self.complete_report(id).await?;
        Ok(board.apply_completion(id, &ack))
    }
}

/// `Rejected` becomes `Ok(None)`; other errors pass through.
fn rejected_as_none(result: Result<Value>) -> Result<Option<Value>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(DashboardError::Rejected { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
