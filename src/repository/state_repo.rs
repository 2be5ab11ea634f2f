// ==========================================
// 校务管理系统 - 全量快照仓储
// ==========================================
// 职责: 整份 SchoolState 的读取与保存
// 存储: school_state 表（单行 JSON 文档，id 固定为 1）
// 红线: Repository 不含业务逻辑，只负责数据访问
// ==========================================

use crate::domain::state::SchoolState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 快照存储接口
///
/// 引擎不依赖此接口，只有 API 层在状态变更后调用 `save`
pub trait SchoolStateStore: Send + Sync {
    /// 读取整份快照（尚未保存过时返回空快照）
    fn load(&self) -> RepositoryResult<SchoolState>;

    /// 保存整份快照（覆盖旧值）
    fn save(&self, state: &SchoolState) -> RepositoryResult<()>;
}

// ==========================================
// SqliteStateRepository - SQLite 快照仓储
// ==========================================
pub struct SqliteStateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStateRepository {
    /// 打开数据库并确保表结构存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::db::ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 最近一次保存时间（未保存过返回 None）
    pub fn last_saved_at(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let saved_at = conn
            .query_row("SELECT saved_at FROM school_state WHERE id = 1", [], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(saved_at)
    }
}

impl SchoolStateStore for SqliteStateRepository {
    fn load(&self) -> RepositoryResult<SchoolState> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row("SELECT state_json FROM school_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!("school_state 表为空，返回空快照");
                Ok(SchoolState::default())
            }
        }
    }

    fn save(&self, state: &SchoolState) -> RepositoryResult<()> {
        let now = Utc::now();
        let mut stamped = state.clone();
        stamped.timestamp = Some(now);
        let json = serde_json::to_string(&stamped)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO school_state (id, state_json, saved_at) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET state_json = ?1, saved_at = ?2
            "#,
            params![json, now.to_rfc3339()],
        )?;
        debug!(bytes = json.len(), "快照已保存");
        Ok(())
    }
}

// ==========================================
// InMemoryStateStore - 内存快照存储
// ==========================================
#[derive(Default)]
pub struct InMemoryStateStore {
    state: Mutex<Option<SchoolState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定快照初始化
    pub fn with_state(state: SchoolState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<Option<SchoolState>>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl SchoolStateStore for InMemoryStateStore {
    fn load(&self) -> RepositoryResult<SchoolState> {
        Ok(self.lock()?.clone().unwrap_or_default())
    }

    fn save(&self, state: &SchoolState) -> RepositoryResult<()> {
        let mut stamped = state.clone();
        stamped.timestamp = Some(Utc::now());
        *self.lock()? = Some(stamped);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
