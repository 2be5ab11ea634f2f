// ==========================================
// 校务管理系统 - 全量状态快照
// ==========================================
// 用途: 持久化存储 load/save 的整体单元
// 说明: 引擎只读入快照并返回新快照，不持有全局状态
// ==========================================

use crate::domain::event::SchoolEvent;
use crate::domain::school_class::SchoolClass;
use crate::domain::student::Student;
use crate::domain::teacher::Teacher;
use crate::domain::types::lenient_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolState {
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub events: Vec<SchoolEvent>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SchoolState {
    pub fn class(&self, class_id: &str) -> Option<&SchoolClass> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn teacher(&self, teacher_id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == teacher_id)
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_half_filled_snapshot_still_loads() {
        let raw = r#"{
            "classes": [{
                "id": "C1", "grade": "4", "section": "A",
                "totalPeriodsPerWeek": null,
                "periodAllocation": [{"subject": "Math", "periods": null}]
            }],
            "teachers": [{"id": "T1", "workload": [
                {"classId": "C1", "subject": "Math", "periods": null}
            ]}],
            "students": [{"id": "S1", "disciplinaryActions": [
                {"type": "Red", "penaltyPoints": null, "date": "not a date"}
            ]}],
            "events": [
                {"id": "E1", "category": "Drama", "date": "2024-03-15T09:00:00.000Z",
                 "participants": [{"studentId": "S1", "role": null}]},
                {"id": "E2", "category": "Sports", "date": ""}
            ],
            "timestamp": "yesterday"
        }"#;

        let state: SchoolState = serde_json::from_str(raw).unwrap();

        assert_eq!(state.classes[0].period_allocation[0].periods, 0);
        assert_eq!(state.classes[0].total_periods_per_week, 0);
        assert_eq!(state.teachers[0].workload[0].periods, 0);
        assert_eq!(state.students[0].discipline_total(), -3);
        assert_eq!(state.students[0].disciplinary_actions[0].date, None);
        assert_eq!(state.events[0].date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(state.events[1].date, None);
        assert_eq!(state.timestamp, None);
    }
}
