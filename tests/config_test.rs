// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证工作量阈值覆写对引擎与 API 的影响
// ==========================================

mod test_helpers;

use school_ops_engine::app::AppState;
use school_ops_engine::config::{config_keys, ConfigManager};
use school_ops_engine::engine::workload::WorkloadPolicy;
use school_ops_engine::repository::{SchoolStateStore, SqliteStateRepository};
use school_ops_engine::LoadBand;
use test_helpers::{class, create_test_db, teacher};

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);

    assert!(config_manager.is_ok(), "ConfigManager should be created successfully");
    assert_eq!(
        config_manager.unwrap().get_workload_policy().unwrap(),
        WorkloadPolicy::default()
    );
}

#[test]
fn test_overrides_are_read_back() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager.set_config_value(config_keys::MAX_PERIODS, "36").unwrap();
    manager.set_config_value(config_keys::OVERLOAD_THRESHOLD, "28").unwrap();

    let policy = manager.get_workload_policy().unwrap();
    assert_eq!(policy.max_periods, 36);
    assert_eq!(policy.overload_threshold, 28);
    assert_eq!(policy.band(29), LoadBand::Over);
}

#[test]
fn test_app_state_applies_configured_ceiling() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    {
        let manager = ConfigManager::new(&db_path).unwrap();
        manager.set_config_value(config_keys::MAX_PERIODS, "36").unwrap();
        manager.set_config_value(config_keys::OVERLOAD_THRESHOLD, "30").unwrap();

        let repo = SqliteStateRepository::new(&db_path).unwrap();
        let mut state = school_ops_engine::SchoolState::default();
        state.classes.push(class("C1", "3", "A", &[("Math", 5)]));
        state.teachers.push(teacher("1", Some("Math"), 32));
        repo.save(&state).unwrap();
    }

    let app = AppState::new(db_path).unwrap();
    let report = app.school_api.auto_allocate().unwrap();

    assert_eq!(app.school_api.policy().max_periods, 36);
    assert!(report.assignments.is_empty(), "32 + 5 > 36，应保持空缺");
    assert_eq!(report.pending.len(), 1);
}
