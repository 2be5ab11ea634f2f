// ==========================================
// 校务管理系统 - 课程配置校验引擎
// ==========================================
// 职责: 校验班级科目课时合计是否等于周课时目标
// 红线: 校验仅供提示，不阻断保存（允许超配/欠配落库）
// ==========================================

use crate::domain::school_class::PeriodAllocation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 课时配置状态（前端警示条用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurriculumStatus {
    Under,
    Exact,
    Over,
}

// ==========================================
// CurriculumCheck - 校验结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumCheck {
    pub current_total: u32,
    pub is_valid: bool,
    pub delta: i64, // target - current_total，正数欠配，负数超配
}

impl CurriculumCheck {
    pub fn status(&self) -> CurriculumStatus {
        match self.delta {
            d if d > 0 => CurriculumStatus::Under,
            0 => CurriculumStatus::Exact,
            _ => CurriculumStatus::Over,
        }
    }
}

/// 校验课时配置
///
/// # 参数
/// - `allocation`: 科目课时列表（缺失/负数课时按 0，合计饱和于 u32::MAX）
/// - `target`: 周课时目标
///
/// # 返回
/// 合计、是否精确相等、差值
pub fn validate(allocation: &[PeriodAllocation], target: u32) -> CurriculumCheck {
    let current_total = allocation
        .iter()
        .fold(0u32, |acc, a| acc.saturating_add(a.effective_periods()));
    CurriculumCheck {
        current_total,
        is_valid: current_total == target,
        delta: target as i64 - current_total as i64,
    }
}

/// 重复出现的科目（按首次重复出现的顺序）
pub fn duplicate_subjects(allocation: &[PeriodAllocation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for a in allocation {
        if !seen.insert(a.subject.as_str()) && !duplicates.contains(&a.subject) {
            duplicates.push(a.subject.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(items: &[(&str, i32)]) -> Vec<PeriodAllocation> {
        items
            .iter()
            .map(|(s, p)| PeriodAllocation::new(s, *p))
            .collect()
    }

    #[test]
    fn test_exact_match_is_valid() {
        let allocation = alloc(&[("Math", 20), ("English", 20)]);
        let check = validate(&allocation, 40);
        assert_eq!(check.current_total, 40);
        assert!(check.is_valid);
        assert_eq!(check.delta, 0);
        assert_eq!(check.status(), CurriculumStatus::Exact);
    }

    #[test]
    fn test_under_allocation() {
        let allocation = alloc(&[("Math", 20), ("English", 20)]);
        let check = validate(&allocation, 45);
        assert!(!check.is_valid);
        assert_eq!(check.delta, 5);
        assert_eq!(check.status(), CurriculumStatus::Under);
    }

    #[test]
    fn test_over_allocation_has_negative_delta() {
        let allocation = alloc(&[("Math", 30), ("English", 20)]);
        let check = validate(&allocation, 40);
        assert!(!check.is_valid);
        assert_eq!(check.delta, -10);
        assert_eq!(check.status(), CurriculumStatus::Over);
    }

    #[test]
    fn test_idempotent() {
        let allocation = alloc(&[("Math", 8), ("Science", -2), ("Art", 3)]);
        assert_eq!(validate(&allocation, 11), validate(&allocation, 11));
        assert!(validate(&allocation, 11).is_valid);
    }

    #[test]
    fn test_empty_allocation() {
        let check = validate(&[], 0);
        assert!(check.is_valid);
        assert_eq!(validate(&[], 40).delta, 40);
    }

    #[test]
    fn test_extreme_periods_do_not_overflow() {
        let allocation = alloc(&[("Math", i32::MAX), ("English", i32::MAX), ("Art", 5)]);
        let check = validate(&allocation, 40);
        assert_eq!(check.current_total, u32::MAX);
        assert!(!check.is_valid);
        assert_eq!(check.delta, 40 - u32::MAX as i64);
        assert_eq!(check.status(), CurriculumStatus::Over);
    }

    #[test]
    fn test_duplicate_subjects() {
        let allocation = alloc(&[("Math", 5), ("Art", 2), ("Math", 3), ("Math", 1)]);
        assert_eq!(duplicate_subjects(&allocation), vec!["Math".to_string()]);
        assert!(duplicate_subjects(&alloc(&[("Math", 5)])).is_empty());
    }
}
