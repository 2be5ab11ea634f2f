// ==========================================
// 校务管理系统 - 学院积分聚合引擎
// ==========================================
// 职责: 按体育/文艺/纪律三类汇总学院积分与学生个人积分
// 输入: 全部活动参与记录 + 全部学生纪律处分
// 输出: 学院积分表（每次全量重算，不落库）
// ==========================================
// 计分表（名次按子串匹配，大小写敏感，依次判断）:
//   "Winner" / "1st"  → 10
//   "Runner" / "2nd"  → 7
//   "Third"  / "3rd"  → 5
//   Participant 且无名次 → 1
//   其他角色无名次，或参与状态非 participant（精确比较）→ 0
// 学院归属: 参与记录上的学院快照优先，缺失时取学生当前学院
// ==========================================

use crate::domain::event::{EventStudentRole, SchoolEvent};
use crate::domain::student::Student;
use crate::domain::types::{EventCategory, EventRole, House};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

pub const WINNER_POINTS: i32 = 10;
pub const RUNNER_UP_POINTS: i32 = 7;
pub const THIRD_PLACE_POINTS: i32 = 5;
pub const PARTICIPATION_POINTS: i32 = 1;

// ==========================================
// HouseStats - 积分汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseStats {
    pub sports: i32,     // >= 0
    pub cultural: i32,   // >= 0
    pub discipline: i32, // <= 0
    pub total: i32,
}

impl HouseStats {
    fn add_event_points(&mut self, category: EventCategory, points: i32) {
        match category {
            EventCategory::Sports => self.sports = self.sports.saturating_add(points),
            EventCategory::Cultural => self.cultural = self.cultural.saturating_add(points),
        }
    }

    fn add_discipline(&mut self, points: i32) {
        self.discipline = self.discipline.saturating_add(points);
    }

    fn finalize(mut self) -> Self {
        self.total = self
            .sports
            .saturating_add(self.cultural)
            .saturating_add(self.discipline);
        self
    }
}

/// 排行榜条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseStanding {
    pub rank: usize, // 从 1 开始
    pub house: House,
    pub stats: HouseStats,
}

// ==========================================
// 计分规则
// ==========================================

/// 名次加分（未匹配返回 None）
pub fn achievement_points(achievement: &str) -> Option<i32> {
    if achievement.contains("Winner") || achievement.contains("1st") {
        Some(WINNER_POINTS)
    } else if achievement.contains("Runner") || achievement.contains("2nd") {
        Some(RUNNER_UP_POINTS)
    } else if achievement.contains("Third") || achievement.contains("3rd") {
        Some(THIRD_PLACE_POINTS)
    } else {
        None
    }
}

/// 单条参与记录得分
pub fn role_points(role: &EventStudentRole) -> i32 {
    if !role.is_active() {
        return 0;
    }
    if let Some(points) = role.achievement.as_deref().and_then(achievement_points) {
        return points;
    }
    match role.role {
        EventRole::Participant => PARTICIPATION_POINTS,
        EventRole::OrganizerVolunteer | EventRole::Other => 0,
    }
}

// ==========================================
// HouseScoringAggregator - 学院积分聚合引擎
// ==========================================
pub struct HouseScoringAggregator {
    // 无状态引擎，不需要注入依赖
}

impl HouseScoringAggregator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算四个学院的积分（四个学院始终都在结果中）
    ///
    /// # 参数
    /// - `events`: 活动列表
    /// - `students`: 学生列表（用于学院回退与纪律扣分）
    #[instrument(skip(self, events, students), fields(
        events_count = events.len(),
        students_count = students.len()
    ))]
    pub fn compute_house_stats(
        &self,
        events: &[SchoolEvent],
        students: &[Student],
    ) -> BTreeMap<House, HouseStats> {
        let mut stats: BTreeMap<House, HouseStats> =
            House::ALL.iter().map(|h| (*h, HouseStats::default())).collect();
        let live_house: HashMap<&str, Option<House>> =
            students.iter().map(|s| (s.id.as_str(), s.house)).collect();

        // 1. 活动积分
        for event in events {
            let category = event.bucket();
            for role in &event.participants {
                let points = role_points(role);
                if points == 0 {
                    continue;
                }
                let house = role.house.or_else(|| {
                    live_house
                        .get(role.student_id.as_str())
                        .copied()
                        .flatten()
                });
                match house {
                    Some(h) => {
                        if let Some(entry) = stats.get_mut(&h) {
                            entry.add_event_points(category, points);
                        }
                    }
                    None => debug!(
                        event_id = %event.id,
                        student_id = %role.student_id,
                        points,
                        "学生无学院归属，积分不计入"
                    ),
                }
            }
        }

        // 2. 纪律扣分（按学生当前学院）
        for student in students {
            let Some(house) = student.house else {
                continue;
            };
            if let Some(entry) = stats.get_mut(&house) {
                entry.add_discipline(student.discipline_total());
            }
        }

        stats.into_iter().map(|(h, s)| (h, s.finalize())).collect()
    }

    /// 计算单个学生的个人积分（不要求学生有学院归属）
    pub fn compute_student_points(
        &self,
        student_id: &str,
        events: &[SchoolEvent],
        students: &[Student],
    ) -> HouseStats {
        let mut stats = HouseStats::default();

        for event in events {
            let category = event.bucket();
            for role in event.participants.iter().filter(|r| r.student_id == student_id) {
                stats.add_event_points(category, role_points(role));
            }
        }

        if let Some(student) = students.iter().find(|s| s.id == student_id) {
            stats.discipline = student.discipline_total();
        }

        stats.finalize()
    }

    /// 学院排行榜（总分降序，同分保持 Red/Blue/Green/Yellow 顺序）
    pub fn leaderboard(&self, events: &[SchoolEvent], students: &[Student]) -> Vec<HouseStanding> {
        let stats = self.compute_house_stats(events, students);
        rank_houses(&stats)
    }
}

impl Default for HouseScoringAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// 对学院积分排序并编号
pub fn rank_houses(stats: &BTreeMap<House, HouseStats>) -> Vec<HouseStanding> {
    let mut rows: Vec<(House, HouseStats)> = House::ALL
        .iter()
        .map(|h| (*h, stats.get(h).copied().unwrap_or_default()))
        .collect();
    rows.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    rows.into_iter()
        .enumerate()
        .map(|(i, (house, stats))| HouseStanding {
            rank: i + 1,
            house,
            stats,
        })
        .collect()
}

/// 默认聚合器下的学院积分
pub fn compute_house_stats(
    events: &[SchoolEvent],
    students: &[Student],
) -> BTreeMap<House, HouseStats> {
    HouseScoringAggregator::new().compute_house_stats(events, students)
}

/// 默认聚合器下的学生个人积分
pub fn compute_student_points(
    student_id: &str,
    events: &[SchoolEvent],
    students: &[Student],
) -> HouseStats {
    HouseScoringAggregator::new().compute_student_points(student_id, events, students)
}
