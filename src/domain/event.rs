// ==========================================
// 校务管理系统 - 校园活动领域模型
// ==========================================
// 用途: 活动参与记录（学院积分的加分来源）
// 说明: 参与记录上的 house 是分配时的快照，缺失时回退到学生当前学院
// ==========================================

use crate::domain::types::{lenient_date, lenient_house, lenient_role, EventCategory, EventRole, House};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// EventStudentRole - 学生参与记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStudentRole {
    pub student_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_house",
        skip_serializing_if = "Option::is_none"
    )]
    pub house: Option<House>,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: EventRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement: Option<String>, // 自由文本，按子串匹配名次
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>, // 缺失视为 participant
}

impl EventStudentRole {
    pub fn participant(student_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            house: None,
            role: EventRole::Participant,
            achievement: None,
            status: None,
        }
    }

    /// 参与状态是否有效（缺失或精确等于 participant）
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "participant")
    }
}

// ==========================================
// SchoolEvent - 校园活动
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub participants: Vec<EventStudentRole>,
}

impl SchoolEvent {
    pub fn bucket(&self) -> EventCategory {
        EventCategory::from_label(&self.category)
    }
}
