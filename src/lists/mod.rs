//! Client-side list state: pagination, the user directory and report moderation.

pub mod pagination;
pub mod reports;
pub mod users;

pub use pagination::{PageRange, Pager};
pub use reports::{
    Acknowledgement, CompletionOutcome, ReportBoard, ReportQuery, SortOrder, StatusFilter,
};
pub use users::UserDirectory;
