// ==========================================
// 校务管理系统 - 核心库
// ==========================================
// 范围: 排课工作量（课程配置校验 / 负载档位 / 零空缺自动分配）
//       与学院积分（体育 / 文艺 / 纪律）
// 技术栈: Rust + SQLite
// 系统定位: 决策支持，人工可随时覆盖自动分配结果
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则（纯函数）
pub mod engine;

// 数据仓储层 - 快照持久化
pub mod repository;

// 配置层 - 工作量阈值覆写
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DisciplineCard, EventCategory, EventRole, Grade, House, LoadBand};

// 领域实体
pub use domain::{
    DisciplinaryAction, EventStudentRole, PeriodAllocation, SchoolClass, SchoolEvent,
    SchoolState, Student, Teacher, WorkloadEntry,
};

// 引擎
pub use engine::{
    auto_allocate, compute_house_stats, compute_student_points, load_band, validate_curriculum,
    workload_of, AllocationResult, AutoAllocationEngine, HouseScoringAggregator, HouseStats,
    WorkloadAggregator, WorkloadPolicy,
};

// API
pub use api::{ApiError, ApiResult, SchoolApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "校务管理系统";
