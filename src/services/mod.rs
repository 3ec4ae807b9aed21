pub mod document;
pub mod issue_tracker;
pub mod language_model;
pub mod license;

pub use document::DocumentSnapshot;
pub use issue_tracker::{IssueDraft, IssueTrackerService};
pub use language_model::LanguageModelService;
pub use license::{LicenseService, LicenseStatus};
