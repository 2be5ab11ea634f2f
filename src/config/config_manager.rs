// ==========================================
// 校务管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::workload::WorkloadPolicy;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（会确保表结构存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取 u32 配置，缺失或格式错误时使用默认值
    fn get_u32_or_default(&self, key: &str, default: u32) -> Result<u32, Box<dyn Error>> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        Ok(raw.trim().parse::<u32>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %raw, default, "配置格式错误，使用默认值");
            default
        }))
    }

    /// 获取所有配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置（覆盖同名 global 配置）
    ///
    /// # 返回
    /// 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    // ===== 工作量配置 =====

    /// 读取工作量策略
    ///
    /// 单项缺失或格式错误回退该项默认值；
    /// 组合后不自洽（欠载 > 超载 或 超载 > 上限）时整体回退默认策略
    pub fn get_workload_policy(&self) -> Result<WorkloadPolicy, Box<dyn Error>> {
        let defaults = WorkloadPolicy::default();
        let policy = WorkloadPolicy {
            full_time_periods: self
                .get_u32_or_default(config_keys::FULL_TIME_PERIODS, defaults.full_time_periods)?,
            max_periods: self.get_u32_or_default(config_keys::MAX_PERIODS, defaults.max_periods)?,
            overload_threshold: self
                .get_u32_or_default(config_keys::OVERLOAD_THRESHOLD, defaults.overload_threshold)?,
            underload_threshold: self
                .get_u32_or_default(config_keys::UNDERLOAD_THRESHOLD, defaults.underload_threshold)?,
        };

        if !policy.is_consistent() {
            tracing::warn!(?policy, "工作量阈值配置不自洽，使用默认策略");
            return Ok(defaults);
        }
        Ok(policy)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 工作量
    pub const FULL_TIME_PERIODS: &str = "workload.full_time_periods";
    pub const MAX_PERIODS: &str = "workload.max_periods";
    pub const OVERLOAD_THRESHOLD: &str = "workload.overload_threshold";
    pub const UNDERLOAD_THRESHOLD: &str = "workload.underload_threshold";
}
