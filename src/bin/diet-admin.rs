//! Command-line front end for the admin dashboard data layer.
//!
//! ```bash
//! diet-admin service
//! diet-admin blood-sugar --type 2형
//! diet-admin users --search kim --page 2
//! diet-admin reports --status waiting --category meal --order oldest
//! diet-admin complete-report 42
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use diet_admin_api::lists::{CompletionOutcome, PageRange, ReportBoard, SortOrder, StatusFilter};
use diet_admin_api::models::{
    DiabetesType, ReportCategory, ReportRecord, ReportStats, UserProfile,
};
use diet_admin_api::state::{Action, AppState};
use diet_admin_api::stats::{goal, meal_pattern};
use diet_admin_api::{Config, DashboardClient};

const UNAVAILABLE: &str = "데이터를 불러오지 못했습니다.";

#[derive(Parser)]
#[command(name = "diet-admin", about = "Diet management admin dashboard client")]
struct Cli {
    /// Backend base URL (overrides DIET_ADMIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a login against the configured admin account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Service usage statistics
    Service,
    /// Allergy statistics
    Allergy,
    /// Blood sugar statistics
    BloodSugar {
        /// Only show one diabetes type (1형, 2형, 임신성, 전단계)
        #[arg(long = "type")]
        diabetes_type: Option<DiabetesType>,
    },
    /// Most recorded and favorite foods
    Foods {
        #[arg(long = "type")]
        diabetes_type: Option<DiabetesType>,
    },
    /// Health goal statistics
    Goals,
    /// Meal recording patterns
    MealPattern,
    /// Paginated user list
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Show full details for this user id
        #[arg(long)]
        expand: Option<usize>,
    },
    /// Report moderation list
    Reports {
        #[command(flatten)]
        filters: ReportFilters,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Mark a waiting report as completed
    CompleteReport {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct ReportFilters {
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,
    #[arg(long, value_enum, default_value_t = CategoryArg::All)]
    category: CategoryArg,
    #[arg(long, value_enum, default_value_t = OrderArg::Latest)]
    order: OrderArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    All,
    Waiting,
    Completed,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    All,
    Weight,
    BloodSugar,
    Meal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Latest,
    Oldest,
}

impl ReportFilters {
    fn apply(&self, board: &mut ReportBoard) {
        board.set_status_filter(match self.status {
            StatusArg::All => StatusFilter::All,
            StatusArg::Waiting => StatusFilter::Waiting,
            StatusArg::Completed => StatusFilter::Completed,
        });
        board.set_category(match self.category {
            CategoryArg::All => None,
            CategoryArg::Weight => Some(ReportCategory::Weight),
            CategoryArg::BloodSugar => Some(ReportCategory::BloodSugar),
            CategoryArg::Meal => Some(ReportCategory::Meal),
        });
        board.set_order(match self.order {
            OrderArg::Latest => SortOrder::Latest,
            OrderArg::Oldest => SortOrder::Oldest,
        });
    }
}

#[derive(Serialize)]
struct Page<'a, T> {
    page: usize,
    total_pages: usize,
    range: PageRange,
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded: Option<&'a UserProfile>,
}

#[derive(Serialize)]
struct ReportPage<'a> {
    stats: ReportStats,
    #[serde(flatten)]
    page: Page<'a, ReportRow<'a>>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    id: i64,
    user_name: &'a str,
    reported_at: String,
    report_type: &'a str,
    status: &'a str,
    content: &'a str,
}

impl<'a> From<&'a ReportRecord> for ReportRow<'a> {
    fn from(r: &'a ReportRecord) -> Self {
        Self {
            id: r.id,
            user_name: &r.user_name,
            reported_at: r.display_time(),
            report_type: &r.report_type,
            status: r.status.label(),
            content: &r.content,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_or_unavailable<T: Serialize>(view: Option<T>) -> Result<()> {
    match view {
        Some(v) => print_json(&v),
        None => {
            eprintln!("{UNAVAILABLE}");
            Ok(())
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// A refusal is an outcome; anything else failing the request is an error.
async fn complete_report(
    client: &DashboardClient,
    board: &mut ReportBoard,
    id: i64,
) -> Result<CompletionOutcome> {
    client
        .complete_report_on(board, id)
        .await
        .inspect_err(|e| tracing::error!(id, error = %e, "report completion failed"))
        .context("처리 중 오류가 발생했습니다.")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let client = DashboardClient::new(&config)?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    match cli.command {
        Command::Login { email, password } => {
            let admin = config
                .admin
                .as_ref()
                .ok_or_else(|| anyhow!("DIET_ADMIN_EMAIL and DIET_ADMIN_PASSWORD are not set"))?;
            admin.verify(&email, &password)?;
            print_json(&AppState::default().reduce(Action::LoggedIn))?;
        }
        Command::Service => {
            let view = client.load_service_stats().await.context(UNAVAILABLE)?;
            print_or_unavailable(view)?;
        }
        Command::Allergy => {
            let view = client.load_allergy_stats().await.context(UNAVAILABLE)?;
            print_or_unavailable(view)?;
        }
        Command::BloodSugar { diabetes_type } => {
            let stats = client.load_blood_sugar_stats().await.context(UNAVAILABLE)?;
            match (stats, diabetes_type) {
                (Some(stats), Some(t)) => print_json(&stats.view(t))?,
                (stats, None) => print_or_unavailable(stats)?,
                (None, Some(_)) => eprintln!("{UNAVAILABLE}"),
            }
        }
        Command::Foods { diabetes_type } => {
            let stats = client.load_popular_food_stats().await.context(UNAVAILABLE)?;
            match diabetes_type {
                Some(t) => print_json(stats.view(t))?,
                None => print_json(&stats)?,
            }
        }
        Command::Goals => {
            print_json(&goal::transform(goal::GoalInput::placeholder()))?;
        }
        Command::MealPattern => {
            print_json(&meal_pattern::transform(
                meal_pattern::MealPatternInput::placeholder(),
            ))?;
        }
        Command::Users {
            search,
            page,
            expand,
        } => {
            let Some(mut directory) = client.load_user_directory().await.context(UNAVAILABLE)?
            else {
                eprintln!("{UNAVAILABLE}");
                return Ok(());
            };
            directory.set_query(search);
            directory.go_to_page(page);
            if let Some(id) = expand {
                directory.toggle_expanded(id);
            }
            print_json(&Page {
                page: directory.page(),
                total_pages: directory.total_pages(),
                range: directory.range(),
                items: directory.visible(),
                expanded: directory.expanded(),
            })?;
        }
        Command::Reports { filters, page } => {
            let mut board = ReportBoard::new();
            filters.apply(&mut board);
            let query = board.query();
            let (stats, list) =
                tokio::join!(client.get_report_stats(), client.get_reports(&query));
            match stats {
                Ok(stats) => board.set_stats(stats),
                Err(e) => tracing::error!(error = %e, "report stats unavailable"),
            }
            board.replace_reports(list.context(UNAVAILABLE)?);
            board.go_to_page(page);
            print_json(&ReportPage {
                stats: board.stats(),
                page: Page {
                    page: board.page(),
                    total_pages: board.total_pages(),
                    range: board.range(),
                    items: board.visible().iter().map(ReportRow::from).collect(),
                    expanded: None,
                },
            })?;
        }
        Command::CompleteReport { id, yes } => {
            let mut board = ReportBoard::new();
            client.refresh_report_stats(&mut board).await?;
            client.refresh_reports(&mut board).await?;

            if !yes && !confirm(&format!("이 신고(#{id})를 처리 완료하시겠습니까?"))? {
                println!("취소되었습니다.");
                return Ok(());
            }

            let outcome = complete_report(&client, &mut board, id).await?;
            match &outcome {
                CompletionOutcome::Rejected { message } => eprintln!("{message}"),
                other => println!("{}", other.message()),
            }
            print_json(&board.stats())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DashboardClient {
        DashboardClient::new(&Config::default().with_api_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn failed_completion_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/management/reports"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let mut board = ReportBoard::new();
        let result = complete_report(&client_for(&server), &mut board, 3).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "처리 중 오류가 발생했습니다.");
        assert_eq!(board.stats(), ReportStats::default());
    }

    #[tokio::test]
    async fn refused_completion_is_an_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/management/reports"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "success": false, "message": "이미 처리된 신고입니다." })),
            )
            .mount(&server)
            .await;

        let mut board = ReportBoard::new();
        let outcome = complete_report(&client_for(&server), &mut board, 3)
            .await
            .unwrap();
        assert!(matches!(outcome, CompletionOutcome::Rejected { .. }));
    }
}
