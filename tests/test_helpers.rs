// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据构造等功能
// ==========================================
#![allow(dead_code)]

use rusqlite::Connection;
use school_ops_engine::domain::event::{EventStudentRole, SchoolEvent};
use school_ops_engine::domain::school_class::{PeriodAllocation, SchoolClass};
use school_ops_engine::domain::state::SchoolState;
use school_ops_engine::domain::student::{DisciplinaryAction, Student};
use school_ops_engine::domain::teacher::{Teacher, WorkloadEntry};
use school_ops_engine::domain::types::{DisciplineCard, EventRole, Grade, House};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_test_connection(&db_path)?;
    school_ops_engine::db::ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（应用统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(school_ops_engine::db::open_sqlite_connection(db_path)?)
}

// ==========================================
// 测试数据构造
// ==========================================

/// 教师（主科 + 已有负载，负载以另一个班级的条目表示）
pub fn teacher(id: &str, main_subject: Option<&str>, existing_load: i32) -> Teacher {
    let mut workload = Vec::new();
    if existing_load > 0 {
        workload.push(WorkloadEntry {
            class_id: format!("EXISTING-{}", id),
            class_name: "EX-A".to_string(),
            subject: "Existing".to_string(),
            periods: existing_load,
        });
    }
    Teacher {
        id: id.to_string(),
        teacher_code: format!("T{}", id),
        name: Some(format!("Teacher {}", id)),
        main_subject: main_subject.map(|s| s.to_string()),
        workload,
        house: None,
        is_house_master: false,
    }
}

/// 班级（科目与周课时，均未分配教师）
pub fn class(id: &str, grade: &str, section: &str, slots: &[(&str, i32)]) -> SchoolClass {
    let period_allocation: Vec<PeriodAllocation> = slots
        .iter()
        .map(|(subject, periods)| PeriodAllocation::new(subject, *periods))
        .collect();
    let total = period_allocation.iter().map(|a| a.effective_periods()).sum();
    SchoolClass {
        id: id.to_string(),
        grade: Grade::from(grade),
        section: section.to_string(),
        period_allocation,
        total_periods_per_week: total,
        student_ids: vec![],
    }
}

/// 学生
pub fn student(id: &str, house: Option<House>, cards: &[DisciplineCard]) -> Student {
    Student {
        id: id.to_string(),
        name: Some(format!("Student {}", id)),
        class_id: None,
        class_name: None,
        house,
        disciplinary_actions: cards.iter().map(|c| DisciplinaryAction::new(*c)).collect(),
    }
}

/// 参与记录
pub fn participant(
    student_id: &str,
    house: Option<House>,
    role: EventRole,
    achievement: Option<&str>,
) -> EventStudentRole {
    EventStudentRole {
        student_id: student_id.to_string(),
        house,
        role,
        achievement: achievement.map(|a| a.to_string()),
        status: None,
    }
}

/// 活动
pub fn event(id: &str, category: &str, participants: Vec<EventStudentRole>) -> SchoolEvent {
    SchoolEvent {
        id: id.to_string(),
        name: Some(format!("Event {}", id)),
        category: category.to_string(),
        date: None,
        participants,
    }
}

/// 一份小而完整的校务快照
pub fn sample_state() -> SchoolState {
    SchoolState {
        classes: vec![
            class("C2", "2", "A", &[("Math", 6), ("English", 6)]),
            class("C1", "1", "A", &[("Math", 6), ("Art", 2)]),
        ],
        teachers: vec![
            teacher("1", Some("Math"), 0),
            teacher("2", Some("English"), 10),
            teacher("3", None, 0),
        ],
        students: vec![
            student("S1", Some(House::Red), &[DisciplineCard::Pink]),
            student("S2", Some(House::Blue), &[]),
            student("S3", None, &[DisciplineCard::Yellow]),
        ],
        events: vec![event(
            "E1",
            "Sports",
            vec![
                participant("S1", Some(House::Red), EventRole::Participant, Some("Winner (1st)")),
                participant("S2", None, EventRole::Participant, None),
            ],
        )],
        timestamp: None,
    }
}
