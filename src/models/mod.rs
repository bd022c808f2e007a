pub mod assignment;
pub mod class_period;
pub mod report;

pub use assignment::{Assignment, TrackedField};
pub use class_period::{ClassPeriod, Grade, Snapshot};
pub use report::{ChangeReport, ChangedAssignment, PeriodChanges};
