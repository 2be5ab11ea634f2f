// ==========================================
// 校务管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: 引擎为纯函数，输入快照、输出新快照，不做持久化
// 红线: 部分分配是正常结果（以数据返回），不是错误
// ==========================================

pub mod allocation;
pub mod assignment;
pub mod curriculum;
pub mod house_scoring;
pub mod workload;

// 重导出核心引擎
pub use allocation::{
    auto_allocate, coverage, AllocationResult, AssignReason, AutoAllocationEngine,
    CoverageSummary, PendingReason, PendingSlot, SlotAssignment,
};
pub use assignment::{
    apply_curriculum, assign_teacher, candidate_groups, resync_class_names,
    sort_classes_for_display, unassign_teacher, AssignmentError, AssignmentOutcome,
    CandidateGroups, CandidateView,
};
pub use curriculum::{CurriculumCheck, CurriculumStatus};
pub use house_scoring::{
    compute_house_stats, compute_student_points, HouseScoringAggregator, HouseStanding,
    HouseStats,
};
pub use workload::{load_band, workload_of, WorkloadAggregator, WorkloadPolicy, WorkloadSummary};

/// 课程配置校验（对外入口名）
pub use curriculum::validate as validate_curriculum;
