use serde::{Deserialize, Serialize};

use super::pagination::{PageRange, Pager};
use crate::models::{ReportCategory, ReportRecord, ReportStats, ReportStatus};

pub const REPORTS_PER_PAGE: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Waiting,
    Completed,
}

impl StatusFilter {
    pub fn query_value(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Waiting => "wait",
            StatusFilter::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

impl SortOrder {
    pub fn query_value(self) -> &'static str {
        match self {
            SortOrder::Latest => "recent",
            SortOrder::Oldest => "old",
        }
    }
}

/// The three server-side filter axes for `GET /reports`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub status: StatusFilter,
    /// `None` means every category.
    pub category: Option<ReportCategory>,
    pub order: SortOrder,
}

impl ReportQuery {
    pub fn params(&self) -> [(&'static str, &'static str); 3] {
        [
            ("status", self.status.query_value()),
            (
                "type",
                self.category.map(ReportCategory::query_value).unwrap_or("all"),
            ),
            ("time", self.order.query_value()),
        ]
    }
}

/// Server reply to `PATCH /reports?id=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// Record flipped to completed, counters moved.
    Applied { message: String },
    /// Server said no; local state untouched.
    Rejected { message: String },
    /// Acknowledged, but nothing local to change (record gone or already completed).
    AlreadyCompleted { message: String },
}

impl CompletionOutcome {
    pub fn message(&self) -> &str {
        match self {
            CompletionOutcome::Applied { message }
            | CompletionOutcome::Rejected { message }
            | CompletionOutcome::AlreadyCompleted { message } => message,
        }
    }
}

/// Report moderation list: server-side filters, client-side pages, and
/// local status updates applied only after the server acknowledges them.
#[derive(Debug, Clone)]
pub struct ReportBoard {
    query: ReportQuery,
    reports: Vec<ReportRecord>,
    stats: ReportStats,
    pager: Pager,
}

impl Default for ReportBoard {
    fn default() -> Self {
        Self {
            query: ReportQuery::default(),
            reports: Vec::new(),
            stats: ReportStats::default(),
            pager: Pager::new(REPORTS_PER_PAGE),
        }
    }
}

impl ReportBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> ReportQuery {
        self.query
    }

    pub fn reports(&self) -> &[ReportRecord] {
        &self.reports
    }

    pub fn stats(&self) -> ReportStats {
        self.stats
    }

    /// Each setter returns `true` when the axis changed and the list must be re-fetched.
    pub fn set_status_filter(&mut self, status: StatusFilter) -> bool {
        let changed = self.query.status != status;
        self.query.status = status;
        self.pager.reset();
        changed
    }

    pub fn set_category(&mut self, category: Option<ReportCategory>) -> bool {
        let changed = self.query.category != category;
        self.query.category = category;
        self.pager.reset();
        changed
    }

    pub fn set_order(&mut self, order: SortOrder) -> bool {
        let changed = self.query.order != order;
        self.query.order = order;
        self.pager.reset();
        changed
    }

    /// Install a freshly fetched list. Server state wins over anything applied locally.
    pub fn replace_reports(&mut self, reports: Vec<ReportRecord>) {
        self.reports = reports;
        self.pager.clamp(self.reports.len());
    }

    pub fn set_stats(&mut self, stats: ReportStats) {
        self.stats = stats;
    }

    pub fn visible(&self) -> &[ReportRecord] {
        self.pager.slice(&self.reports)
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.reports.len())
    }

    pub fn range(&self) -> PageRange {
        self.pager.range(self.reports.len())
    }

    pub fn next_page(&mut self) {
        self.pager.next(self.reports.len());
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to(page, self.reports.len());
    }

    pub fn find(&self, id: i64) -> Option<&ReportRecord> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Whether `id` is on the board and still waiting.
    pub fn can_complete(&self, id: i64) -> bool {
        self.find(id)
            .is_some_and(|r| r.status == ReportStatus::Waiting)
    }

    /// Apply the server's answer to a completion request for `id`.
    ///
    /// Counters only move when a waiting record actually flips, so a repeated
    /// acknowledgement for the same id never double-counts.
    pub fn apply_completion(&mut self, id: i64, ack: &Acknowledgement) -> CompletionOutcome {
        let message = ack.message.clone();
        if !ack.success {
            tracing::warn!(id, %message, "report completion rejected");
            return CompletionOutcome::Rejected { message };
        }

        match self.reports.iter_mut().find(|r| r.id == id) {
            Some(record) if record.status == ReportStatus::Waiting => {
                record.status = ReportStatus::Completed;
                self.stats.waiting = self.stats.waiting.saturating_sub(1);
                self.stats.approval += 1;
                tracing::info!(id, "report marked completed");
                CompletionOutcome::Applied { message }
            }
            _ => CompletionOutcome::AlreadyCompleted { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: i64, status: ReportStatus) -> ReportRecord {
        ReportRecord {
            id,
            user_name: format!("user{id}"),
            reported_at: Some("2025-12-01T10:00:00".to_string()),
            report_type: "식단 관리".to_string(),
            content: "부적절한 게시물".to_string(),
            status,
        }
    }

    fn ok(message: &str) -> Acknowledgement {
        Acknowledgement {
            success: true,
            message: message.to_string(),
        }
    }

    fn board_with_two_waiting() -> ReportBoard {
        let mut board = ReportBoard::new();
        board.replace_reports(vec![
            report(1, ReportStatus::Waiting),
            report(2, ReportStatus::Waiting),
        ]);
        board.set_stats(ReportStats {
            total: 2,
            waiting: 2,
            approval: 0,
        });
        board
    }

    #[test]
    fn completing_one_report() {
        let mut board = board_with_two_waiting();
        let outcome = board.apply_completion(1, &ok("처리 완료되었습니다."));
        assert_eq!(
            outcome,
            CompletionOutcome::Applied {
                message: "처리 완료되었습니다.".to_string()
            }
        );
        assert_eq!(
            board.stats(),
            ReportStats {
                total: 2,
                waiting: 1,
                approval: 1
            }
        );
        assert_eq!(board.find(1).unwrap().status, ReportStatus::Completed);
        assert_eq!(board.find(1).unwrap().status.label(), "처리완료");
        assert_eq!(board.find(2).unwrap().status, ReportStatus::Waiting);
    }

    #[test]
    fn repeated_completion_does_not_double_count() {
        let mut board = board_with_two_waiting();
        board.apply_completion(1, &ok("done"));
        let again = board.apply_completion(1, &ok("done"));
        assert!(matches!(again, CompletionOutcome::AlreadyCompleted { .. }));

        let rejected = board.apply_completion(
            1,
            &Acknowledgement {
                success: false,
                message: "이미 처리된 신고입니다.".to_string(),
            },
        );
        assert_eq!(rejected.message(), "이미 처리된 신고입니다.");
        assert_eq!(board.stats().waiting, 1);
        assert_eq!(board.stats().approval, 1);
    }

    #[test]
    fn waiting_counter_floors_at_zero() {
        let mut board = board_with_two_waiting();
        board.set_stats(ReportStats::default());
        board.apply_completion(2, &ok(""));
        assert_eq!(board.stats().waiting, 0);
        assert_eq!(board.stats().approval, 1);
    }

    #[test]
    fn filter_changes_reset_page_and_map_to_query() {
        let mut board = ReportBoard::new();
        board.replace_reports((1..=12).map(|i| report(i, ReportStatus::Waiting)).collect());
        board.next_page();
        board.next_page();
        assert_eq!(board.page(), 3);
        assert_eq!(board.visible().len(), 2);

        assert!(board.set_status_filter(StatusFilter::Waiting));
        assert_eq!(board.page(), 1);
        assert!(!board.set_status_filter(StatusFilter::Waiting));

        board.set_category(Some(ReportCategory::BloodSugar));
        board.set_order(SortOrder::Oldest);
        assert_eq!(
            board.query().params(),
            [("status", "wait"), ("type", "blood_sugar"), ("time", "old")]
        );
        assert_eq!(
            ReportQuery::default().params(),
            [("status", "all"), ("type", "all"), ("time", "recent")]
        );
    }

    #[test]
    fn refetch_overwrites_local_state() {
        let mut board = board_with_two_waiting();
        board.apply_completion(1, &ok(""));
        board.replace_reports(vec![report(1, ReportStatus::Waiting)]);
        assert!(board.can_complete(1));
        assert!(!board.can_complete(2));
    }
}
