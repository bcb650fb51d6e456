pub mod advertiser;
pub mod columns;
pub mod config;
pub mod error;
pub mod fields;
pub mod job;
pub mod pipeline;
pub mod sample;
pub mod sanitize;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod ticket;
pub mod timespan;

pub use columns::{ColumnSet, ColumnSpec, ColumnSpecParser};
pub use config::{load_config, load_default_config, Config};
pub use error::{
    ConfigError, CronError, ReportGenError, Result, ScheduleError, StorageError, StoreError,
    TicketError, TimespanError,
};
pub use fields::FieldMapper;
pub use job::{JobAssembler, JobDefinition, ValidationQuery};
pub use pipeline::{Pipeline, PipelineContext, PipelineError, PipelineOutcome};
pub use schedule::{CronExpression, Lag, LagCalculator, ReportCadence, ScheduleInterpreter};
pub use storage::ArtifactWriter;
pub use store::{AnalyticsStore, ClickHouseStore, QueryResult};
pub use ticket::{TicketRecord, TicketRequest};
pub use timespan::{Timespan, TimespanResolver};
