// ==========================================
// 自动分配引擎集成测试
// ==========================================
// 测试目标: 验证零空缺引擎的选人规则与 40 节硬上限
// 覆盖范围: 主科优先、低负载优先、宁缺勿超、兜底分配、课程配置校验
// ==========================================

mod test_helpers;

use school_ops_engine::engine::allocation::{AssignReason, AutoAllocationEngine, PendingReason};
use school_ops_engine::engine::workload::{workload_of, WorkloadPolicy};
use school_ops_engine::{auto_allocate, load_band, validate_curriculum, LoadBand, PeriodAllocation};
use test_helpers::{class, teacher};

#[test]
fn test_validator_exact_and_over() {
    let allocation = vec![
        PeriodAllocation::new("Math", 20),
        PeriodAllocation::new("English", 20),
    ];

    let ok = validate_curriculum(&allocation, 40);
    assert!(ok.is_valid);
    assert_eq!(ok.current_total, 40);
    assert_eq!(ok.delta, 0);
    assert_eq!(validate_curriculum(&allocation, 40), ok, "校验应幂等");

    let over = validate_curriculum(&allocation, 35);
    assert!(!over.is_valid);
    assert_eq!(over.delta, -5);

    let with_extra = vec![
        PeriodAllocation::new("Math", 25),
        PeriodAllocation::new("English", 20),
    ];
    let check = validate_curriculum(&with_extra, 40);
    assert!(!check.is_valid);
    assert_eq!(check.current_total, 45);
    assert_eq!(check.delta.abs(), 5);
}

#[test]
fn test_band_boundaries() {
    assert_eq!(load_band(19), LoadBand::Under);
    assert_eq!(load_band(20), LoadBand::Optimal);
    assert_eq!(load_band(32), LoadBand::Optimal);
    assert_eq!(load_band(33), LoadBand::Over);
}

#[test]
fn test_specialist_beats_idle_generalist() {
    let classes = vec![class("C1", "5", "A", &[("Math", 5)])];
    let teachers = vec![teacher("A", Some("Math"), 10), teacher("B", Some("Art"), 0)];

    let result = auto_allocate(classes, teachers);

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].teacher_id, "A");
    assert_eq!(result.assignments[0].reason, AssignReason::Specialist);
    assert_eq!(workload_of(&result.teachers[0]), 15);
}

#[test]
fn test_lower_load_specialist_wins() {
    let classes = vec![class("C1", "5", "A", &[("Math", 5)])];
    let teachers = vec![teacher("A", Some("Math"), 25), teacher("B", Some("Math"), 10)];

    let result = auto_allocate(classes, teachers);

    assert_eq!(result.assignments[0].teacher_id, "B");
}

#[test]
fn test_slot_left_unfilled_rather_than_overload() {
    let classes = vec![class("C1", "5", "A", &[("Math", 5)])];
    let teachers = vec![teacher("A", Some("Math"), 38)];

    let result = auto_allocate(classes, teachers);

    assert!(result.assignments.is_empty());
    assert_eq!(result.pending.len(), 1);
    assert_eq!(result.pending[0].reason, PendingReason::NoCapacity);
    assert!(result.classes[0].period_allocation[0].is_unfilled());
    assert_eq!(workload_of(&result.teachers[0]), 38, "负载不应变化");
}

#[test]
fn test_fallback_to_any_teacher_with_capacity() {
    let classes = vec![class("C1", "5", "A", &[("Math", 5)])];
    let teachers = vec![teacher("A", Some("Math"), 38), teacher("B", Some("Art"), 30)];

    let result = auto_allocate(classes, teachers);

    assert_eq!(result.assignments[0].teacher_id, "B");
    assert_eq!(result.assignments[0].reason, AssignReason::Fallback);
    assert_eq!(result.assignments[0].load_after, 35);
}

#[test]
fn test_ceiling_holds_across_a_whole_school() {
    let mut classes = Vec::new();
    for i in 0..12 {
        classes.push(class(
            &format!("C{:02}", i),
            &format!("{}", i % 12 + 1),
            "A",
            &[("Math", 7), ("English", 6), ("Science", 5), ("Art", 2)],
        ));
    }
    let teachers = vec![
        teacher("M1", Some("Math"), 0),
        teacher("M2", Some("Math"), 12),
        teacher("E1", Some("English"), 0),
        teacher("S1", Some("Science"), 20),
        teacher("G1", None, 0),
    ];

    let result = AutoAllocationEngine::new(WorkloadPolicy::default()).allocate(classes, teachers);

    for t in &result.teachers {
        assert!(workload_of(t) <= 40, "教师 {} 负载 {} 超过上限", t.id, workload_of(t));
    }
    assert!(!result.pending.is_empty(), "总需求远超总容量，必须有空缺");
    let filled: usize = result
        .classes
        .iter()
        .flat_map(|c| c.period_allocation.iter())
        .filter(|a| !a.is_unfilled())
        .count();
    assert_eq!(filled, result.assignments.len());
}

#[test]
fn test_rerun_is_stable() {
    let classes = vec![class("C1", "5", "A", &[("Math", 5), ("Art", 2)])];
    let teachers = vec![teacher("A", Some("Math"), 0), teacher("B", Some("Art"), 0)];

    let first = auto_allocate(classes, teachers);
    let second = auto_allocate(first.classes.clone(), first.teachers.clone());

    assert!(second.assignments.is_empty(), "已分配课位不应再次分配");
    assert_eq!(second.classes, first.classes);
    assert_eq!(second.teachers, first.teachers);
}
