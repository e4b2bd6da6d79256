pub mod auth;
pub mod campus;
pub mod chat;
pub mod config;
pub mod enrollment;
pub mod notify;
pub mod roster;
pub mod testing;
pub mod ticket;

pub use auth::{
    create_authenticator, Actor, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator,
    NoneAuthenticator, StaffDirectory,
};
pub use campus::Campus;
pub use chat::{ChatClient, ChatError};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, CampusConfig, ChatConfig,
    Config, ConfigError, RosterConfig, SanitizedConfig, SchedulerConfig, ServerConfig,
};
pub use enrollment::{
    project, resolve_by_handle, resolve_by_linked_id, ApplicationRecord, DecisionOutcome,
    EnrollmentError, EnrollmentService, LinkOutcome, NotifyTarget, Resolution, ScanSummary,
    StaffStatus, StatusView, StudentStatus, EMPTY_SHEET_REASON,
};
pub use notify::{Notifier, NullNotifier, PlatformNotifier};
pub use roster::{
    resolve_header, ApplicantKind, FieldKey, FieldWrite, RecordStore, RosterError, RowRef,
    SheetTable, SheetsRecordStore, TabCache, UpdateOutcome,
};
pub use ticket::{ChannelRef, PlatformTicketGateway, TicketContext, TicketError, TicketGateway};
