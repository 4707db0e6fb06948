pub mod config;
pub mod event;
pub mod report;
pub mod vm;
pub mod workunit;

pub use config::{MasterConfig, UnitTemplate, VmSpec};
pub use event::{Event, EventKind};
pub use report::{ReportRow, RunReport};
pub use vm::{Vm, VmId, VmMetrics};
pub use workunit::{WorkKind, WorkUnit, WorkUnitId, MULTI_CORE_OVERHEAD_PER_PE};
