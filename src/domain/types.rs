// ==========================================
// 校务管理系统 - 领域类型定义
// ==========================================
// 约定: 序列化格式与前端存储的 JSON 保持一致
// 约定: 未知取值宽松处理（不报错），由各类型定义回退值
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// 学院 (House)
// ==========================================
// 固定四个学院，声明顺序即排行榜同分时的稳定顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum House {
    Red,
    Blue,
    Green,
    Yellow,
}

impl House {
    /// 全部学院（插入顺序）
    pub const ALL: [House; 4] = [House::Red, House::Blue, House::Green, House::Yellow];

    /// 从字符串解析学院（大小写不敏感，未知返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Some(House::Red),
            "blue" => Some(House::Blue),
            "green" => Some(House::Green),
            "yellow" => Some(House::Yellow),
            _ => None,
        }
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            House::Red => "house.red",
            House::Blue => "house.blue",
            House::Green => "house.green",
            House::Yellow => "house.yellow",
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            House::Red => write!(f, "Red"),
            House::Blue => write!(f, "Blue"),
            House::Green => write!(f, "Green"),
            House::Yellow => write!(f, "Yellow"),
        }
    }
}

/// 宽松解析可选学院字段
///
/// 空字符串、未知学院名、null 一律视为 None，不让半填写的记录导致整份状态加载失败
pub fn lenient_house<'de, D>(deserializer: D) -> Result<Option<House>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(House::parse))
}

// ==========================================
// 宽松数值/日期解析
// ==========================================
// 前端表单留空时会写出 null（NaN 序列化结果）、空串或字符串数字，
// 这些取值一律归一化，不让单条记录导致整份状态加载失败

/// 将任意 JSON 值归一化为 i64（null/非数字/非有限值为 None）
fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
            })
        }
        _ => None,
    }
}

fn clamp_i32(n: i64) -> i32 {
    n.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// 宽松解析课时（null、空串、非数字按 0，超出 i32 范围截断）
pub fn lenient_periods<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value).map(clamp_i32).unwrap_or(0))
}

/// 宽松解析非负计数（null、负数、非数字按 0）
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0))
}

/// 宽松解析可选整数（null、非数字视为缺失）
pub fn lenient_points<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value).map(clamp_i32))
}

/// 宽松解析日期
///
/// 接受 "YYYY-MM-DD" 与 RFC 3339 时间戳（取日期部分），其余视为 None
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Some(raw) = value.as_str().map(str::trim) else {
        return Ok(None);
    };
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    }))
}

/// 宽松解析时间戳（RFC 3339，无法解析视为 None）
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

// ==========================================
// 工作量档位 (Load Band)
// ==========================================
// < 20 欠载, 20..=32 适中, > 32 超载
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadBand {
    Under,
    Optimal,
    Over,
}

impl LoadBand {
    /// 从字符串解析档位（用于命令行/查询过滤）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNDER" => Some(LoadBand::Under),
            "OPTIMAL" => Some(LoadBand::Optimal),
            "OVER" => Some(LoadBand::Over),
            _ => None,
        }
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            LoadBand::Under => "workload.band.under",
            LoadBand::Optimal => "workload.band.optimal",
            LoadBand::Over => "workload.band.over",
        }
    }
}

impl fmt::Display for LoadBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadBand::Under => write!(f, "UNDER"),
            LoadBand::Optimal => write!(f, "OPTIMAL"),
            LoadBand::Over => write!(f, "OVER"),
        }
    }
}

// ==========================================
// 年级 (Grade)
// ==========================================
// 合法取值: Nur / LKG / UKG / 1..=12
// 展示排序: Nur < LKG < UKG < 1 < ... < 12 < 其他
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    Nursery,
    Lkg,
    Ukg,
    Standard(u8),
    Other(String),
}

impl Grade {
    fn sort_key(&self) -> (u8, u8) {
        match self {
            Grade::Nursery => (0, 0),
            Grade::Lkg => (0, 1),
            Grade::Ukg => (0, 2),
            Grade::Standard(n) => (1, *n),
            Grade::Other(_) => (2, 0),
        }
    }
}

impl From<String> for Grade {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "Nur" => Grade::Nursery,
            "LKG" => Grade::Lkg,
            "UKG" => Grade::Ukg,
            _ => match trimmed.parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => Grade::Standard(n),
                _ => Grade::Other(raw),
            },
        }
    }
}

impl From<&str> for Grade {
    fn from(raw: &str) -> Self {
        Grade::from(raw.to_string())
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Nursery => write!(f, "Nur"),
            Grade::Lkg => write!(f, "LKG"),
            Grade::Ukg => write!(f, "UKG"),
            Grade::Standard(n) => write!(f, "{}", n),
            Grade::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl PartialOrd for Grade {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Grade {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key()).then_with(|| match (self, other) {
            (Grade::Other(a), Grade::Other(b)) => a.cmp(b),
            _ => Ordering::Equal,
        })
    }
}

// ==========================================
// 活动类别 (Event Category)
// ==========================================
// 仅 "Sports"（大小写敏感）计入体育，其余一律计入文艺
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Sports,
    Cultural,
}

impl EventCategory {
    pub fn from_label(label: &str) -> Self {
        if label == "Sports" {
            EventCategory::Sports
        } else {
            EventCategory::Cultural
        }
    }
}

// ==========================================
// 活动角色 (Event Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRole {
    Participant,
    #[serde(rename = "Organizer/Volunteer")]
    OrganizerVolunteer,
    /// 未识别的角色字符串（不计基础分）
    #[serde(other)]
    Other,
}

impl Default for EventRole {
    fn default() -> Self {
        EventRole::Participant
    }
}

impl EventRole {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Participant" => EventRole::Participant,
            "Organizer/Volunteer" => EventRole::OrganizerVolunteer,
            _ => EventRole::Other,
        }
    }
}

/// 宽松解析活动角色
///
/// null 与缺失同样取默认角色；非字符串、未知字符串为 Other
pub fn lenient_role<'de, D>(deserializer: D) -> Result<EventRole, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => EventRole::default(),
        Value::String(label) => EventRole::from_label(&label),
        _ => EventRole::Other,
    })
}

// ==========================================
// 纪律处分卡 (Discipline Card)
// ==========================================
// Yellow=-1, Pink=-2, Red=-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisciplineCard {
    Yellow,
    Pink,
    Red,
}

impl DisciplineCard {
    /// 处分卡默认扣分（记录缺少 penaltyPoints 时使用）
    pub fn default_penalty(&self) -> i32 {
        match self {
            DisciplineCard::Yellow => -1,
            DisciplineCard::Pink => -2,
            DisciplineCard::Red => -3,
        }
    }
}

impl fmt::Display for DisciplineCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisciplineCard::Yellow => write!(f, "Yellow"),
            DisciplineCard::Pink => write!(f, "Pink"),
            DisciplineCard::Red => write!(f, "Red"),
        }
    }
}
