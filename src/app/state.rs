// ==========================================
// 校务管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::SchoolApi;
use crate::config::config_manager::ConfigManager;
use crate::engine::workload::WorkloadPolicy;
use crate::repository::state_repo::{SchoolStateStore, SqliteStateRepository};

/// 应用状态
///
/// 界面层与维护命令共用的单例
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 校务API
    pub school_api: Arc<SchoolApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 1. 打开共享连接并建表
    /// 2. 读取工作量策略（读取失败使用默认策略）
    /// 3. 加载快照并创建 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::ensure_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        match crate::db::read_schema_version(&conn) {
            Ok(Some(v)) if v > crate::db::CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    db_version = v,
                    expected = crate::db::CURRENT_SCHEMA_VERSION,
                    "数据库 schema_version 高于当前程序版本"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败(将继续启动): {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let policy = config_manager.get_workload_policy().unwrap_or_else(|e| {
            tracing::warn!("读取工作量配置失败，使用默认策略: {}", e);
            WorkloadPolicy::default()
        });

        let store: Arc<dyn SchoolStateStore> =
            Arc::new(SqliteStateRepository::from_connection(conn));
        let school_api = Arc::new(
            SchoolApi::new(store, policy).map_err(|e| format!("无法加载校务快照: {}", e))?,
        );

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            school_api,
            config_manager,
        })
    }
}

/// 默认数据库路径
///
/// 优先读取环境变量 SCHOOL_OPS_DB_PATH，其次使用用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("SCHOOL_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./school_ops.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("school-ops-engine-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("school-ops-engine");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("school_ops.db");
    }

    path.to_string_lossy().to_string()
}
