// ==========================================
// 校务管理系统 - 自动分配引擎（零空缺引擎）
// ==========================================
// 职责: 为所有空缺课位分配任课教师，尽量达到 100% 覆盖
// 输入: 全部班级（课时配置）+ 全部教师（当前工作量）
// 输出: 更新后的班级与教师 + 分配明细 + 仍待分配的课位
// ==========================================
// 规则:
// 1) 班级按 id 升序处理，科目按配置数组顺序处理
// 2) 优先主科匹配的推荐教师，取当前负载最低者（同负载取列表靠前者）
// 3) 推荐教师均放不下时，在全部教师中取负载最低者
// 4) 任何分配不得使教师超过上限；都放不下则保持空缺
// 5) 负载在整轮中实时累计，后续课位看到前面的分配结果
// 红线: 贪心单轮，不回溯已做的分配
// ==========================================

use crate::domain::school_class::SchoolClass;
use crate::domain::teacher::{Teacher, WorkloadEntry};
use crate::engine::workload::{workload_of, WorkloadPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

// ==========================================
// 分配结果类型
// ==========================================

/// 分配依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignReason {
    Specialist, // 主科匹配，负载最低
    Fallback,   // 推荐教师均无余量，全体教师中负载最低
}

impl fmt::Display for AssignReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignReason::Specialist => write!(f, "SPECIALIST"),
            AssignReason::Fallback => write!(f, "FALLBACK"),
        }
    }
}

/// 空缺原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingReason {
    NoCapacity,   // 所有教师加上该课位都会超过上限
    NoTeachers,   // 教师列表为空
    EmptySubject, // 科目名为空
}

impl PendingReason {
    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            PendingReason::NoCapacity => "allocation.pending.no_capacity",
            PendingReason::NoTeachers => "allocation.pending.no_teachers",
            PendingReason::EmptySubject => "allocation.pending.empty_subject",
        }
    }
}

impl fmt::Display for PendingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingReason::NoCapacity => write!(f, "NO_CAPACITY"),
            PendingReason::NoTeachers => write!(f, "NO_TEACHERS"),
            PendingReason::EmptySubject => write!(f, "EMPTY_SUBJECT"),
        }
    }
}

/// 一次成功分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    pub class_id: String,
    pub class_name: String,
    pub subject: String,
    pub periods: u32,
    pub teacher_id: String,
    pub load_after: u32,
    pub reason: AssignReason,
}

/// 仍待分配的课位（前端显示 "Pending"）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSlot {
    pub class_id: String,
    pub class_name: String,
    pub subject: String,
    pub periods: u32,
    pub reason: PendingReason,
}

/// 自动分配结果
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub classes: Vec<SchoolClass>,
    pub teachers: Vec<Teacher>,
    pub assignments: Vec<SlotAssignment>,
    pub pending: Vec<PendingSlot>,
}

impl AllocationResult {
    /// 是否已无空缺
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// 课位覆盖率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub total_slots: usize,
    pub filled_slots: usize,
    pub pending_slots: usize,
    pub coverage_pct: f64,
}

/// 统计全校课位覆盖率（无课位时视为 100%）
pub fn coverage(classes: &[SchoolClass]) -> CoverageSummary {
    let total_slots: usize = classes.iter().map(|c| c.period_allocation.len()).sum();
    let pending_slots: usize = classes.iter().map(|c| c.unfilled_count()).sum();
    let filled_slots = total_slots - pending_slots;
    let coverage_pct = if total_slots == 0 {
        100.0
    } else {
        filled_slots as f64 / total_slots as f64 * 100.0
    };
    CoverageSummary {
        total_slots,
        filled_slots,
        pending_slots,
        coverage_pct,
    }
}

// ==========================================
// AutoAllocationEngine - 自动分配引擎
// ==========================================
pub struct AutoAllocationEngine {
    policy: WorkloadPolicy,
}

impl AutoAllocationEngine {
    pub fn new(policy: WorkloadPolicy) -> Self {
        Self { policy }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 自动填补全部空缺课位
    ///
    /// # 参数
    /// - `classes`: 班级列表（输出保持输入顺序）
    /// - `teachers`: 教师列表（列表顺序即同负载时的优先顺序）
    ///
    /// # 返回
    /// 新的班级/教师快照及分配明细；无法填补的课位进入 pending，不报错
    #[instrument(skip(self, classes, teachers), fields(
        classes_count = classes.len(),
        teachers_count = teachers.len(),
        max_periods = self.policy.max_periods
    ))]
    pub fn allocate(
        &self,
        mut classes: Vec<SchoolClass>,
        mut teachers: Vec<Teacher>,
    ) -> AllocationResult {
        let mut assignments = Vec::new();
        let mut pending = Vec::new();

        // 运行中负载（整轮累计）
        let mut loads: Vec<u32> = teachers.iter().map(workload_of).collect();

        // 班级处理顺序: id 升序（稳定排序）
        let mut order: Vec<usize> = (0..classes.len()).collect();
        order.sort_by(|a, b| classes[*a].id.cmp(&classes[*b].id));

        for ci in order {
            let class_id = classes[ci].id.clone();
            let class_name = classes[ci].display_name();

            for si in 0..classes[ci].period_allocation.len() {
                let slot = &classes[ci].period_allocation[si];
                if !slot.is_unfilled() {
                    continue;
                }
                let subject = slot.subject.clone();
                let periods = slot.effective_periods();

                let blocked = if subject.trim().is_empty() {
                    Some(PendingReason::EmptySubject)
                } else if teachers.is_empty() {
                    Some(PendingReason::NoTeachers)
                } else {
                    None
                };
                if let Some(reason) = blocked {
                    pending.push(PendingSlot {
                        class_id: class_id.clone(),
                        class_name: class_name.clone(),
                        subject,
                        periods,
                        reason,
                    });
                    continue;
                }

                // 1. 推荐教师 → 2. 全体教师
                let pick = self
                    .pick_lowest_load(&teachers, &loads, &class_id, &subject, periods, true)
                    .map(|ti| (ti, AssignReason::Specialist))
                    .or_else(|| {
                        self.pick_lowest_load(&teachers, &loads, &class_id, &subject, periods, false)
                            .map(|ti| (ti, AssignReason::Fallback))
                    });

                let (ti, reason) = match pick {
                    Some(p) => p,
                    None => {
                        debug!(
                            class_id = %class_id,
                            subject = %subject,
                            periods,
                            "NO_CAPACITY: 所有教师均会超过上限，课位保持空缺"
                        );
                        pending.push(PendingSlot {
                            class_id: class_id.clone(),
                            class_name: class_name.clone(),
                            subject,
                            periods,
                            reason: PendingReason::NoCapacity,
                        });
                        continue;
                    }
                };

                // 3. 提交分配
                let teacher = &mut teachers[ti];
                classes[ci].period_allocation[si].assigned_teacher_id = Some(teacher.id.clone());
                let replaced = teacher.upsert_workload(WorkloadEntry {
                    class_id: class_id.clone(),
                    class_name: class_name.clone(),
                    subject: subject.clone(),
                    periods: periods as i32,
                });
                loads[ti] = loads[ti].saturating_sub(replaced).saturating_add(periods);

                debug!(
                    class_id = %class_id,
                    subject = %subject,
                    teacher_id = %teacher.id,
                    load_after = loads[ti],
                    reason = %reason,
                    "课位已分配"
                );
                assignments.push(SlotAssignment {
                    class_id: class_id.clone(),
                    class_name: class_name.clone(),
                    subject,
                    periods,
                    teacher_id: teacher.id.clone(),
                    load_after: loads[ti],
                    reason,
                });
            }
        }

        info!(
            assigned = assignments.len(),
            pending = pending.len(),
            "自动分配完成"
        );

        AllocationResult {
            classes,
            teachers,
            assignments,
            pending,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 在候选教师中选出负载最低且放得下该课位的教师
    ///
    /// 比较与容量判断都基于扣除同 (班级, 科目) 旧条目后的负载，
    /// 同负载时保留列表中靠前的教师（严格小于才替换）
    fn pick_lowest_load(
        &self,
        teachers: &[Teacher],
        loads: &[u32],
        class_id: &str,
        subject: &str,
        periods: u32,
        specialists_only: bool,
    ) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, teacher) in teachers.iter().enumerate() {
            if specialists_only && !teacher.is_specialist_for(subject) {
                continue;
            }
            // 已有同 (班级, 科目) 条目时按覆盖计算
            let base = loads[i].saturating_sub(teacher.periods_for(class_id, subject));
            if !self.policy.fits(base, periods) {
                continue;
            }
            match best {
                Some((_, best_base)) if best_base <= base => {}
                _ => best = Some((i, base)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl Default for AutoAllocationEngine {
    fn default() -> Self {
        Self::new(WorkloadPolicy::default())
    }
}

/// 默认策略下的自动分配
pub fn auto_allocate(classes: Vec<SchoolClass>, teachers: Vec<Teacher>) -> AllocationResult {
    AutoAllocationEngine::default().allocate(classes, teachers)
}
