use serde::{Deserialize, Serialize};

/// Dashboard screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    ServiceStats,
    AllergyStats,
    BloodSugarStats,
    PopularFoodStats,
    GoalStats,
    MealPatternStats,
    UserList,
    Reports,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::ServiceStats,
        Section::AllergyStats,
        Section::BloodSugarStats,
        Section::PopularFoodStats,
        Section::GoalStats,
        Section::MealPatternStats,
        Section::UserList,
        Section::Reports,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::ServiceStats => "서비스 통계",
            Section::AllergyStats => "알레르기",
            Section::BloodSugarStats => "혈당 관리",
            Section::PopularFoodStats => "인기 음식",
            Section::GoalStats => "건강 목표",
            Section::MealPatternStats => "식사 패턴",
            Section::UserList => "사용자 리스트",
            Section::Reports => "신고 관리",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoggedIn,
    LoggedOut,
    Navigate(Section),
    OpenSidebar,
    CloseSidebar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub section: Section,
    pub sidebar_open: bool,
    pub logged_in: bool,
}

impl AppState {
    pub fn reduce(self, action: Action) -> AppState {
        match action {
            Action::LoggedIn => AppState {
                section: Section::ServiceStats,
                sidebar_open: false,
                logged_in: true,
            },
            Action::LoggedOut => AppState {
                logged_in: false,
                sidebar_open: false,
                ..self
            },
            // Screens are only reachable once logged in.
            Action::Navigate(_) if !self.logged_in => self,
            Action::Navigate(section) => AppState {
                section,
                sidebar_open: false,
                ..self
            },
            Action::OpenSidebar => AppState {
                sidebar_open: self.logged_in,
                ..self
            },
            Action::CloseSidebar => AppState {
                sidebar_open: false,
                ..self
            },
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        *self = self.reduce(action);
    }
}
