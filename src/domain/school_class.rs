// ==========================================
// 校务管理系统 - 班级领域模型
// ==========================================
// 用途: 课程配置（科目 × 周课时 × 任课教师）
// 红线: 课时合计与周目标不一致时只提示，不阻断保存
// ==========================================

use crate::domain::types::{lenient_count, lenient_periods, Grade};
use serde::{Deserialize, Serialize};

// ==========================================
// PeriodAllocation - 科目课时配置（课位）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAllocation {
    pub subject: String,                     // 科目（班内唯一）
    #[serde(default, deserialize_with = "lenient_periods")]
    pub periods: i32,                        // 周课时（缺失/null/非数字按 0）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_teacher_id: Option<String>, // 任课教师（空串视同未分配）
}

impl PeriodAllocation {
    pub fn new(subject: &str, periods: i32) -> Self {
        Self {
            subject: subject.to_string(),
            periods,
            assigned_teacher_id: None,
        }
    }

    /// 有效课时（负数按 0）
    pub fn effective_periods(&self) -> u32 {
        self.periods.max(0) as u32
    }

    /// 已分配的教师ID（空串视同未分配）
    pub fn assigned_teacher(&self) -> Option<&str> {
        self.assigned_teacher_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// 是否为空缺课位
    pub fn is_unfilled(&self) -> bool {
        self.assigned_teacher().is_none()
    }
}

// ==========================================
// SchoolClass - 班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: String,
    pub grade: Grade,
    pub section: String,
    #[serde(default)]
    pub period_allocation: Vec<PeriodAllocation>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_periods_per_week: u32,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl SchoolClass {
    /// 展示名称，例如 "10-A"
    ///
    /// 教师工作量与学生记录中的 className 冗余缓存都来自这里
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.grade, self.section)
    }

    pub fn slot(&self, subject: &str) -> Option<&PeriodAllocation> {
        self.period_allocation.iter().find(|a| a.subject == subject)
    }

    pub fn slot_mut(&mut self, subject: &str) -> Option<&mut PeriodAllocation> {
        self.period_allocation
            .iter_mut()
            .find(|a| a.subject == subject)
    }

    /// 空缺课位数量
    pub fn unfilled_count(&self) -> usize {
        self.period_allocation
            .iter()
            .filter(|a| a.is_unfilled())
            .count()
    }
}
