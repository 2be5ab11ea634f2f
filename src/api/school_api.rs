// ==========================================
// 校务管理系统 - 校务 API
// ==========================================
// 职责: 持有内存快照，串联引擎调用与持久化
// 1. 课程配置校验 / 替换
// 2. 自动分配（零空缺引擎）与人工分配
// 3. 教师负载视图
// 4. 学院积分与排行榜
// ==========================================
// 红线: 保存失败只记 warn，内存快照仍为准（不重试、不回滚）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::school_class::PeriodAllocation;
use crate::domain::state::SchoolState;
use crate::domain::types::{House, LoadBand};
use crate::engine::allocation::{
    coverage, AutoAllocationEngine, CoverageSummary, PendingSlot, SlotAssignment,
};
use crate::engine::assignment::{self, AssignmentOutcome, CandidateGroups};
use crate::engine::curriculum::{self, CurriculumCheck};
use crate::engine::house_scoring::{HouseScoringAggregator, HouseStanding, HouseStats};
use crate::engine::workload::{WorkloadAggregator, WorkloadPolicy, WorkloadSummary};
use crate::repository::state_repo::SchoolStateStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// 响应类型
// ==========================================

/// 自动分配报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub run_id: String,
    pub run_at: DateTime<Utc>,
    pub assignments: Vec<SlotAssignment>,
    pub pending: Vec<PendingSlot>,
    pub coverage: CoverageSummary,
    pub persisted: bool,
}

/// 写操作结果（附带是否已落库）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persisted<T> {
    pub value: T,
    pub persisted: bool,
}

// ==========================================
// SchoolApi - 校务 API
// ==========================================
pub struct SchoolApi {
    store: Arc<dyn SchoolStateStore>,
    state: Mutex<SchoolState>,
    policy: WorkloadPolicy,
}

impl SchoolApi {
    /// 从存储加载快照并创建 API 实例
    pub fn new(store: Arc<dyn SchoolStateStore>, policy: WorkloadPolicy) -> ApiResult<Self> {
        let state = store.load()?;
        info!(
            classes = state.classes.len(),
            teachers = state.teachers.len(),
            students = state.students.len(),
            events = state.events.len(),
            "校务快照已加载"
        );
        Ok(Self {
            store,
            state: Mutex::new(state),
            policy,
        })
    }

    pub fn policy(&self) -> WorkloadPolicy {
        self.policy
    }

    fn lock_state(&self) -> ApiResult<MutexGuard<'_, SchoolState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::StateLockError(e.to_string()))
    }

    /// 保存快照（失败只告警）
    fn persist(&self, state: &SchoolState) -> bool {
        match self.store.save(state) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "快照保存失败，内存状态仍然有效");
                false
            }
        }
    }

    // ==========================================
    // 快照
    // ==========================================

    /// 当前快照副本
    pub fn snapshot(&self) -> ApiResult<SchoolState> {
        Ok(self.lock_state()?.clone())
    }

    /// 整体替换快照（导入 / 恢复备份）
    pub fn replace_state(&self, new_state: SchoolState) -> ApiResult<bool> {
        let mut state = self.lock_state()?;
        *state = new_state;
        info!(classes = state.classes.len(), "快照已整体替换");
        Ok(self.persist(&state))
    }

    // ==========================================
    // 课程配置
    // ==========================================

    /// 校验班级当前课程配置
    pub fn validate_curriculum(&self, class_id: &str) -> ApiResult<CurriculumCheck> {
        let state = self.lock_state()?;
        let class = state
            .class(class_id)
            .ok_or_else(|| ApiError::NotFound(format!("班级(id={})不存在", class_id)))?;
        Ok(curriculum::validate(
            &class.period_allocation,
            class.total_periods_per_week,
        ))
    }

    /// 替换班级课程配置（校验不通过照常保存）
    pub fn update_curriculum(
        &self,
        class_id: &str,
        allocation: Vec<PeriodAllocation>,
        target: u32,
    ) -> ApiResult<Persisted<CurriculumCheck>> {
        if allocation.iter().any(|a| a.subject.trim().is_empty()) {
            return Err(ApiError::InvalidInput("科目名称不能为空".to_string()));
        }

        let mut guard = self.lock_state()?;
        let state = &mut *guard;
        let check = assignment::apply_curriculum(
            &mut state.classes,
            &mut state.teachers,
            class_id,
            allocation,
            target,
        )?;
        info!(class_id, current_total = check.current_total, target, "课程配置已更新");
        let persisted = self.persist(state);
        Ok(Persisted {
            value: check,
            persisted,
        })
    }

    // ==========================================
    // 分配
    // ==========================================

    /// 自动分配（零空缺引擎），结果写回快照
    #[instrument(skip(self))]
    pub fn auto_allocate(&self) -> ApiResult<AllocationReport> {
        let mut state = self.lock_state()?;
        let engine = AutoAllocationEngine::new(self.policy);
        // 引擎在副本上计算，完成后才替换快照
        let result = engine.allocate(state.classes.clone(), state.teachers.clone());
        state.classes = result.classes;
        state.teachers = result.teachers;

        let summary = coverage(&state.classes);
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            assigned = result.assignments.len(),
            pending = result.pending.len(),
            coverage_pct = summary.coverage_pct,
            "自动分配完成"
        );
        let persisted = self.persist(&state);

        Ok(AllocationReport {
            run_id,
            run_at: Utc::now(),
            assignments: result.assignments,
            pending: result.pending,
            coverage: summary,
            persisted,
        })
    }

    /// 人工指定任课教师
    pub fn assign_teacher(
        &self,
        class_id: &str,
        subject: &str,
        teacher_id: &str,
    ) -> ApiResult<Persisted<AssignmentOutcome>> {
        let mut guard = self.lock_state()?;
        let state = &mut *guard;
        let outcome = assignment::assign_teacher(
            &mut state.classes,
            &mut state.teachers,
            class_id,
            subject,
            teacher_id,
            &self.policy,
        )?;
        if outcome.band_after == LoadBand::Over {
            warn!(teacher_id, load = outcome.load_after, "人工分配后教师超载");
        }
        let persisted = self.persist(state);
        Ok(Persisted {
            value: outcome,
            persisted,
        })
    }

    /// 取消任课教师
    pub fn unassign_teacher(
        &self,
        class_id: &str,
        subject: &str,
    ) -> ApiResult<Persisted<Option<String>>> {
        let mut guard = self.lock_state()?;
        let state = &mut *guard;
        let previous =
            assignment::unassign_teacher(&mut state.classes, &mut state.teachers, class_id, subject)?;
        info!(class_id, subject, previous = ?previous, "已取消任课教师");
        let persisted = self.persist(state);
        Ok(Persisted {
            value: previous,
            persisted,
        })
    }

    /// 下拉框候选教师
    pub fn candidate_teachers(&self, subject: &str) -> ApiResult<CandidateGroups> {
        let state = self.lock_state()?;
        Ok(assignment::candidate_groups(&state.teachers, subject, &self.policy))
    }

    /// 当前空缺统计
    pub fn coverage(&self) -> ApiResult<CoverageSummary> {
        Ok(coverage(&self.lock_state()?.classes))
    }

    // ==========================================
    // 负载视图
    // ==========================================

    /// 教师负载列表（可按档位过滤）
    pub fn teacher_workloads(&self, band: Option<LoadBand>) -> ApiResult<Vec<WorkloadSummary>> {
        let state = self.lock_state()?;
        Ok(WorkloadAggregator::new(self.policy).summarize(&state.teachers, band))
    }

    // ==========================================
    // 学院积分
    // ==========================================

    pub fn house_stats(&self) -> ApiResult<BTreeMap<House, HouseStats>> {
        let state = self.lock_state()?;
        Ok(HouseScoringAggregator::new().compute_house_stats(&state.events, &state.students))
    }

    pub fn house_leaderboard(&self) -> ApiResult<Vec<HouseStanding>> {
        let state = self.lock_state()?;
        Ok(HouseScoringAggregator::new().leaderboard(&state.events, &state.students))
    }

    pub fn student_points(&self, student_id: &str) -> ApiResult<HouseStats> {
        let state = self.lock_state()?;
        if state.student(student_id).is_none() {
            return Err(ApiError::NotFound(format!("学生(id={})不存在", student_id)));
        }
        Ok(HouseScoringAggregator::new().compute_student_points(
            student_id,
            &state.events,
            &state.students,
        ))
    }

    // ==========================================
    // 冗余同步
    // ==========================================

    /// 重算 className 冗余缓存并按展示顺序排列班级
    pub fn resync_names(&self) -> ApiResult<Persisted<usize>> {
        let mut guard = self.lock_state()?;
        let state = &mut *guard;
        let changed =
            assignment::resync_class_names(&state.classes, &mut state.teachers, &mut state.students);
        assignment::sort_classes_for_display(&mut state.classes);
        info!(changed, "className 冗余缓存已同步");
        let persisted = self.persist(state);
        Ok(Persisted {
            value: changed,
            persisted,
        })
    }
}
