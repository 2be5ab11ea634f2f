// ==========================================
// 校务管理系统 - 教师领域模型
// ==========================================
// 用途: 教师主科 + 工作量明细
// 说明: workload 是 (班级, 科目) 维度的冗余缓存，每对最多一条
// ==========================================

use crate::domain::types::{lenient_house, lenient_periods, House};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkloadEntry - 工作量明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    pub class_id: String,
    #[serde(default)]
    pub class_name: String, // 冗余缓存，班级改名后需重新同步
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_periods")]
    pub periods: i32,
}

impl WorkloadEntry {
    /// 有效课时（负数按 0）
    pub fn effective_periods(&self) -> u32 {
        self.periods.max(0) as u32
    }

    pub fn matches(&self, class_id: &str, subject: &str) -> bool {
        self.class_id == class_id && self.subject == subject
    }
}

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    #[serde(default)]
    pub teacher_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_subject: Option<String>, // 主科（自动分配时的推荐依据）
    #[serde(default)]
    pub workload: Vec<WorkloadEntry>,
    #[serde(
        default,
        deserialize_with = "lenient_house",
        skip_serializing_if = "Option::is_none"
    )]
    pub house: Option<House>,
    #[serde(default)]
    pub is_house_master: bool,
}

impl Teacher {
    /// 是否为该科目的推荐教师（主科精确匹配，大小写敏感）
    pub fn is_specialist_for(&self, subject: &str) -> bool {
        self.main_subject.as_deref() == Some(subject)
    }

    /// 写入或覆盖 (班级, 科目) 工作量条目
    ///
    /// # 返回
    /// 被覆盖条目的原课时（无则为 0）
    pub fn upsert_workload(&mut self, entry: WorkloadEntry) -> u32 {
        match self
            .workload
            .iter_mut()
            .find(|w| w.matches(&entry.class_id, &entry.subject))
        {
            Some(existing) => {
                let previous = existing.effective_periods();
                *existing = entry;
                previous
            }
            None => {
                self.workload.push(entry);
                0
            }
        }
    }

    /// 移除 (班级, 科目) 工作量条目
    ///
    /// # 返回
    /// 被移除条目的课时（无则为 None）
    pub fn remove_workload(&mut self, class_id: &str, subject: &str) -> Option<u32> {
        let pos = self
            .workload
            .iter()
            .position(|w| w.matches(class_id, subject))?;
        Some(self.workload.remove(pos).effective_periods())
    }

    /// 已有 (班级, 科目) 条目的课时
    pub fn periods_for(&self, class_id: &str, subject: &str) -> u32 {
        self.workload
            .iter()
            .find(|w| w.matches(class_id, subject))
            .map(|w| w.effective_periods())
            .unwrap_or(0)
    }
}
