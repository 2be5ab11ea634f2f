// ==========================================
// 校务管理系统 - 工作量聚合引擎
// ==========================================
// 职责: 计算教师周课时负载与档位
// 输入: 教师工作量明细
// 输出: 负载合计 + 档位 (欠载/适中/超载)
// ==========================================
// 阈值: 满负荷参考 40 节，超载阈值 32 节 (≈80%)，欠载阈值 20 节 (≈50%)
// 上限: 自动分配不得使任何教师超过 40 节
// ==========================================

use crate::domain::teacher::{Teacher, WorkloadEntry};
use crate::domain::types::LoadBand;
use serde::{Deserialize, Serialize};

/// 满负荷参考课时
pub const FULL_TIME_PERIODS: u32 = 40;
/// 自动分配硬上限
pub const MAX_PERIODS: u32 = 40;
/// 超载阈值（> 该值为超载）
pub const OVERLOAD_THRESHOLD: u32 = 32;
/// 欠载阈值（< 该值为欠载）
pub const UNDERLOAD_THRESHOLD: u32 = 20;

// ==========================================
// WorkloadPolicy - 工作量策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPolicy {
    pub full_time_periods: u32,
    pub max_periods: u32,
    pub overload_threshold: u32,
    pub underload_threshold: u32,
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            full_time_periods: FULL_TIME_PERIODS,
            max_periods: MAX_PERIODS,
            overload_threshold: OVERLOAD_THRESHOLD,
            underload_threshold: UNDERLOAD_THRESHOLD,
        }
    }
}

impl WorkloadPolicy {
    /// 阈值是否自洽（欠载 <= 超载 <= 上限，且满负荷 > 0）
    pub fn is_consistent(&self) -> bool {
        self.full_time_periods > 0
            && self.underload_threshold <= self.overload_threshold
            && self.overload_threshold <= self.max_periods
    }

    /// 负载档位
    pub fn band(&self, load: u32) -> LoadBand {
        if load < self.underload_threshold {
            LoadBand::Under
        } else if load > self.overload_threshold {
            LoadBand::Over
        } else {
            LoadBand::Optimal
        }
    }

    /// 负载占满负荷的百分比
    pub fn utilization_pct(&self, load: u32) -> f64 {
        if self.full_time_periods == 0 {
            return 0.0;
        }
        load as f64 / self.full_time_periods as f64 * 100.0
    }

    /// 加上 periods 后是否仍不超过上限
    pub fn fits(&self, load: u32, periods: u32) -> bool {
        load.saturating_add(periods) <= self.max_periods
    }
}

// ==========================================
// 纯函数入口
// ==========================================

/// 工作量明细合计（缺失/负数课时按 0，饱和累加）
pub fn load(workload: &[WorkloadEntry]) -> u32 {
    workload
        .iter()
        .fold(0u32, |acc, w| acc.saturating_add(w.effective_periods()))
}

/// 教师当前负载
pub fn workload_of(teacher: &Teacher) -> u32 {
    load(&teacher.workload)
}

/// 默认策略下的负载档位
pub fn load_band(load: u32) -> LoadBand {
    WorkloadPolicy::default().band(load)
}

// ==========================================
// WorkloadSummary - 教师负载视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSummary {
    pub teacher_id: String,
    pub teacher_code: String,
    pub load: u32,
    pub band: LoadBand,
    pub utilization_pct: f64,
}

// ==========================================
// WorkloadAggregator - 工作量聚合引擎
// ==========================================
pub struct WorkloadAggregator {
    policy: WorkloadPolicy,
}

impl WorkloadAggregator {
    pub fn new(policy: WorkloadPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WorkloadPolicy {
        &self.policy
    }

    pub fn summarize_one(&self, teacher: &Teacher) -> WorkloadSummary {
        let load = workload_of(teacher);
        WorkloadSummary {
            teacher_id: teacher.id.clone(),
            teacher_code: teacher.teacher_code.clone(),
            load,
            band: self.policy.band(load),
            utilization_pct: self.policy.utilization_pct(load),
        }
    }

    /// 汇总教师负载（保持教师列表顺序）
    ///
    /// # 参数
    /// - `band_filter`: 仅保留指定档位；None 表示全部
    pub fn summarize(
        &self,
        teachers: &[Teacher],
        band_filter: Option<LoadBand>,
    ) -> Vec<WorkloadSummary> {
        teachers
            .iter()
            .map(|t| self.summarize_one(t))
            .filter(|s| band_filter.map_or(true, |b| s.band == b))
            .collect()
    }
}

impl Default for WorkloadAggregator {
    fn default() -> Self {
        Self::new(WorkloadPolicy::default())
    }
}
