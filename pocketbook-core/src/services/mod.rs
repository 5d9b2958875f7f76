//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod demo;
pub mod logging;
pub mod migration;
mod persisted;
mod preferences;
mod report;
mod workspace;

pub use auth::{AuthService, RegistrationForm, Session, MIN_PASSWORD_LEN};
pub use demo::DemoService;
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LogFilter, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use persisted::DiscardHook;
pub use preferences::PreferencesService;
pub use report::{BudgetStatus, GoalProgress, ReminderStatus, Report, ReportService};
pub use workspace::WorkspaceService;
