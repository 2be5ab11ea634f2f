// ==========================================
// 校务管理系统 - 人工分配与冗余同步
// ==========================================
// 职责:
// - 任课教师下拉框候选分组（推荐 / 其他）
// - 人工指定 / 取消任课教师，保持课位与教师工作量一致
// - 课程配置整体替换（校验仅提示）
// - 班级改名后重算 className 冗余缓存
// 红线: 人工分配不受 40 节上限约束，只返回档位供前端提示
// ==========================================

use crate::domain::school_class::{PeriodAllocation, SchoolClass};
use crate::domain::student::Student;
use crate::domain::teacher::{Teacher, WorkloadEntry};
use crate::domain::types::LoadBand;
use crate::engine::curriculum::{self, CurriculumCheck};
use crate::engine::workload::{workload_of, WorkloadPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// 人工分配错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("班级不存在: class_id={0}")]
    ClassNotFound(String),

    #[error("班级未配置该科目: class_id={class_id}, subject={subject}")]
    SubjectNotFound { class_id: String, subject: String },

    #[error("教师不存在: teacher_id={0}")]
    TeacherNotFound(String),
}

// ==========================================
// 候选教师分组
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub teacher_id: String,
    pub teacher_code: String,
    pub load: u32,
    pub band: LoadBand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateGroups {
    pub recommended: Vec<CandidateView>,
    pub others: Vec<CandidateView>,
}

/// 按主科把教师分为推荐组与其他组（保持列表顺序）
pub fn candidate_groups(
    teachers: &[Teacher],
    subject: &str,
    policy: &WorkloadPolicy,
) -> CandidateGroups {
    let mut groups = CandidateGroups::default();
    for teacher in teachers {
        let load = workload_of(teacher);
        let view = CandidateView {
            teacher_id: teacher.id.clone(),
            teacher_code: teacher.teacher_code.clone(),
            load,
            band: policy.band(load),
        };
        if teacher.is_specialist_for(subject) {
            groups.recommended.push(view);
        } else {
            groups.others.push(view);
        }
    }
    groups
}

// ==========================================
// 人工指定 / 取消
// ==========================================

/// 人工分配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOutcome {
    pub class_id: String,
    pub subject: String,
    pub teacher_id: String,
    pub previous_teacher_id: Option<String>,
    pub load_after: u32,
    pub band_after: LoadBand,
}

/// 人工指定任课教师
///
/// 从原任课教师的工作量中移除该 (班级, 科目)，并写入新教师
pub fn assign_teacher(
    classes: &mut [SchoolClass],
    teachers: &mut [Teacher],
    class_id: &str,
    subject: &str,
    teacher_id: &str,
    policy: &WorkloadPolicy,
) -> Result<AssignmentOutcome, AssignmentError> {
    let ti = teachers
        .iter()
        .position(|t| t.id == teacher_id)
        .ok_or_else(|| AssignmentError::TeacherNotFound(teacher_id.to_string()))?;
    let class = classes
        .iter_mut()
        .find(|c| c.id == class_id)
        .ok_or_else(|| AssignmentError::ClassNotFound(class_id.to_string()))?;
    let class_name = class.display_name();
    let slot = class
        .slot_mut(subject)
        .ok_or_else(|| AssignmentError::SubjectNotFound {
            class_id: class_id.to_string(),
            subject: subject.to_string(),
        })?;

    let previous_teacher_id = slot.assigned_teacher().map(|s| s.to_string());
    let periods = slot.effective_periods();
    slot.assigned_teacher_id = Some(teacher_id.to_string());

    if let Some(prev) = previous_teacher_id.as_deref() {
        if let Some(prev_teacher) = teachers.iter_mut().find(|t| t.id == prev) {
            prev_teacher.remove_workload(class_id, subject);
        }
    }

    let teacher = &mut teachers[ti];
    teacher.upsert_workload(WorkloadEntry {
        class_id: class_id.to_string(),
        class_name,
        subject: subject.to_string(),
        periods: periods as i32,
    });
    let load_after = workload_of(teacher);
    let band_after = policy.band(load_after);

    info!(
        class_id,
        subject,
        teacher_id,
        previous = ?previous_teacher_id,
        load_after,
        band = %band_after,
        "人工指定任课教师"
    );

    Ok(AssignmentOutcome {
        class_id: class_id.to_string(),
        subject: subject.to_string(),
        teacher_id: teacher_id.to_string(),
        previous_teacher_id,
        load_after,
        band_after,
    })
}

/// 取消任课教师
///
/// # 返回
/// 原任课教师ID（本来就空缺时为 None）
pub fn unassign_teacher(
    classes: &mut [SchoolClass],
    teachers: &mut [Teacher],
    class_id: &str,
    subject: &str,
) -> Result<Option<String>, AssignmentError> {
    let class = classes
        .iter_mut()
        .find(|c| c.id == class_id)
        .ok_or_else(|| AssignmentError::ClassNotFound(class_id.to_string()))?;
    let slot = class
        .slot_mut(subject)
        .ok_or_else(|| AssignmentError::SubjectNotFound {
            class_id: class_id.to_string(),
            subject: subject.to_string(),
        })?;

    let previous = slot.assigned_teacher().map(|s| s.to_string());
    slot.assigned_teacher_id = None;

    if let Some(prev) = previous.as_deref() {
        if let Some(teacher) = teachers.iter_mut().find(|t| t.id == prev) {
            teacher.remove_workload(class_id, subject);
        }
    }
    Ok(previous)
}

// ==========================================
// 课程配置替换
// ==========================================

/// 替换班级课程配置
///
/// 规则:
/// 1) 保留科目的已有任课教师延续，课时变化同步到教师工作量
/// 2) 被删除科目的任课教师工作量条目一并移除
/// 3) 合计与目标不一致照常保存，校验结果仅返回给调用方
pub fn apply_curriculum(
    classes: &mut [SchoolClass],
    teachers: &mut [Teacher],
    class_id: &str,
    mut allocation: Vec<PeriodAllocation>,
    target: u32,
) -> Result<CurriculumCheck, AssignmentError> {
    let class = classes
        .iter_mut()
        .find(|c| c.id == class_id)
        .ok_or_else(|| AssignmentError::ClassNotFound(class_id.to_string()))?;
    let class_name = class.display_name();

    let previous: HashMap<String, Option<String>> = class
        .period_allocation
        .iter()
        .map(|a| (a.subject.clone(), a.assigned_teacher().map(|s| s.to_string())))
        .collect();

    // 新配置未显式给出教师时沿用旧教师
    for entry in allocation.iter_mut() {
        if entry.is_unfilled() {
            entry.assigned_teacher_id = previous.get(&entry.subject).cloned().flatten();
        }
    }

    // 移除旧教师在本班的过期条目
    for (subject, teacher_id) in &previous {
        let Some(teacher_id) = teacher_id else {
            continue;
        };
        let still_assigned = allocation
            .iter()
            .any(|a| &a.subject == subject && a.assigned_teacher() == Some(teacher_id.as_str()));
        if !still_assigned {
            if let Some(teacher) = teachers.iter_mut().find(|t| &t.id == teacher_id) {
                teacher.remove_workload(class_id, subject);
            }
        }
    }

    // 写入当前配置对应的教师条目
    for entry in &allocation {
        if let Some(teacher_id) = entry.assigned_teacher() {
            if let Some(teacher) = teachers.iter_mut().find(|t| t.id == teacher_id) {
                teacher.upsert_workload(WorkloadEntry {
                    class_id: class_id.to_string(),
                    class_name: class_name.clone(),
                    subject: entry.subject.clone(),
                    periods: entry.effective_periods() as i32,
                });
            }
        }
    }

    let check = curriculum::validate(&allocation, target);
    let duplicates = curriculum::duplicate_subjects(&allocation);
    if !check.is_valid || !duplicates.is_empty() {
        debug!(
            class_id,
            current_total = check.current_total,
            target,
            ?duplicates,
            "课程配置与周课时目标不一致，照常保存"
        );
    }

    class.period_allocation = allocation;
    class.total_periods_per_week = target;
    Ok(check)
}

// ==========================================
// 冗余同步与展示排序
// ==========================================

/// 按班级当前名称重算教师工作量与学生记录中的 className
///
/// # 返回
/// 被修改的记录条数
pub fn resync_class_names(
    classes: &[SchoolClass],
    teachers: &mut [Teacher],
    students: &mut [Student],
) -> usize {
    let names: HashMap<&str, String> = classes
        .iter()
        .map(|c| (c.id.as_str(), c.display_name()))
        .collect();
    let mut changed = 0;

    for teacher in teachers.iter_mut() {
        for entry in teacher.workload.iter_mut() {
            if let Some(name) = names.get(entry.class_id.as_str()) {
                if &entry.class_name != name {
                    entry.class_name = name.clone();
                    changed += 1;
                }
            }
        }
    }

    for student in students.iter_mut() {
        let Some(class_id) = student.class_id.as_deref() else {
            continue;
        };
        if let Some(name) = names.get(class_id) {
            if student.class_name.as_ref() != Some(name) {
                student.class_name = Some(name.clone());
                changed += 1;
            }
        }
    }

    changed
}

/// 展示排序: 年级顺序（Nur, LKG, UKG, 1..12），再按班号
pub fn sort_classes_for_display(classes: &mut [SchoolClass]) {
    classes.sort_by(|a, b| a.grade.cmp(&b.grade).then_with(|| a.section.cmp(&b.section)));
}
