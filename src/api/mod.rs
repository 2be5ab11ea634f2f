// ==========================================
// 校务管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面层与维护命令调用
// ==========================================

pub mod error;
pub mod school_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use school_api::{AllocationReport, Persisted, SchoolApi};
