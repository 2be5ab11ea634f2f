// ==========================================
// 校务管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod event;
pub mod school_class;
pub mod state;
pub mod student;
pub mod teacher;
pub mod types;

// 重导出核心类型
pub use event::{EventStudentRole, SchoolEvent};
pub use school_class::{PeriodAllocation, SchoolClass};
pub use state::SchoolState;
pub use student::{DisciplinaryAction, Student};
pub use teacher::{Teacher, WorkloadEntry};
pub use types::{DisciplineCard, EventCategory, EventRole, Grade, House, LoadBand};
