pub mod assembler;
pub mod definition;
pub mod validation;

pub use assembler::{JobAssembler, JobInputs};
pub use definition::{
    ExportSetting, ExternalDependency, JobDefinition, ReportDefinition, ScriptedTableReport,
    Timedelta,
};
pub use validation::{sample_window, ValidationQuery};
