// ==========================================
// 校务管理系统 - 学生领域模型
// ==========================================
// 用途: 学院归属 + 纪律处分（学院积分的扣分来源）
// ==========================================

use crate::domain::types::{lenient_date, lenient_house, lenient_points, DisciplineCard, House};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DisciplinaryAction - 纪律处分
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplinaryAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub card: DisciplineCard,
    #[serde(
        default,
        deserialize_with = "lenient_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub penalty_points: Option<i32>, // 缺失时按处分卡默认值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
}

impl DisciplinaryAction {
    pub fn new(card: DisciplineCard) -> Self {
        Self {
            id: None,
            card,
            penalty_points: Some(card.default_penalty()),
            reason: None,
            date: None,
        }
    }

    /// 实际扣分（恒 <= 0，正数按 0 处理）
    pub fn effective_penalty(&self) -> i32 {
        self.penalty_points
            .unwrap_or_else(|| self.card.default_penalty())
            .min(0)
    }
}

// ==========================================
// Student - 学生
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>, // 冗余缓存
    #[serde(
        default,
        deserialize_with = "lenient_house",
        skip_serializing_if = "Option::is_none"
    )]
    pub house: Option<House>,
    #[serde(default)]
    pub disciplinary_actions: Vec<DisciplinaryAction>,
}

impl Student {
    /// 纪律扣分合计（<= 0，饱和累加）
    pub fn discipline_total(&self) -> i32 {
        self.disciplinary_actions
            .iter()
            .fold(0i32, |acc, a| acc.saturating_add(a.effective_penalty()))
    }
}
