//! Company officer appointments core: delta-consistent ingestion plus
//! listing aggregation over a pluggable record store.

pub mod app;
pub mod config;
pub mod consistency;
pub mod error;
pub mod listing;
pub mod logging;
pub mod metrics_source;
pub mod model;
pub mod notification;
pub mod profile;
pub mod store;
pub mod summary;

pub use config::{AppConfig, ConfigError};
pub use consistency::{
    Clock, ConsistencyEngine, ConsistencySnapshot, SystemClock,
    PLACEHOLDER_PREVIOUS_OFFICER_ID,
};
pub use error::ServiceError;
pub use listing::{
    AppointmentList, FetchAppointmentsRequest, ListLinks, ListingEngine, OfficerAppointmentList,
    PageLimits, DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE, MAX_OFFICER_ITEMS_PER_PAGE,
};
pub use logging::{
    JsonLineLogger, LogFile, LogLevel, LogRotationPolicy, LoggingError, RequestContext,
    ServiceLogger,
};
pub use metrics_source::{
    CompanyMetrics, HttpMetricsSource, MetricsError, MetricsSource, RegisterStatus,
    StaticMetricsSource, PUBLIC_REGISTER,
};
pub use model::{
    Address, AppointmentRecord, CompanyStatus, ContactDetails, DateOfBirth, DeltaAt, DeltaAtError,
    FormerName, Identification, ItemLinks, OfficerData, OfficerLinks, RegisterType, SensitiveData,
};
pub use notification::{
    HttpNotificationPublisher, NotificationPublisher, PublishError, PublishedEvent,
    RecordingPublisher,
};
pub use profile::{
    CompanyProfile, CompanyProfileSource, HttpProfileSource, ProfileError, StaticProfileSource,
};
pub use store::{
    InMemoryRecordStore, ListingQuery, OfficerQuery, QueryPage, RecordStore, SortKey, StoreError,
};
pub use summary::{
    deletion_snapshot, display_name, stub_deleted_snapshot, summarize, DateOfBirthView,
    OfficerSummary,
};
