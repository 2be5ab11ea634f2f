// 维护命令: 在不启动界面的情况下对数据库执行引擎操作，结果以 JSON 输出到 stdout。
//
// Usage:
//   school-ops-engine [db_path] <command> [arg]
//
// Commands:
//   auto-allocate                  填补全部空缺课位并保存
//   houses                         学院排行榜
//   workloads [under|optimal|over] 教师负载（可按档位过滤）
//   coverage                       课位覆盖率
//   curriculum                     各班周课时合计校验
//
// db_path 缺省时使用 SCHOOL_OPS_DB_PATH 或用户数据目录。
// SCHOOL_OPS_LOCALE 可切换日志中的提示语言（zh-CN / en）。

use anyhow::{anyhow, bail, Context, Result};
use school_ops_engine::app::{get_default_db_path, AppState};
use school_ops_engine::domain::types::LoadBand;
use school_ops_engine::{i18n, logging};
use serde_json::json;

const COMMANDS: [&str; 5] = ["auto-allocate", "houses", "workloads", "coverage", "curriculum"];

fn main() -> Result<()> {
    if std::env::var("SCHOOL_OPS_LOG_JSON").is_ok() {
        logging::init_json();
    } else {
        logging::init();
    }
    if let Ok(locale) = std::env::var("SCHOOL_OPS_LOCALE") {
        i18n::set_locale(&locale);
    }

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let db_path = match args.first() {
        Some(first) if !COMMANDS.contains(&first.as_str()) => args.remove(0),
        _ => get_default_db_path(),
    };
    let command = args
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("缺少命令，可用命令: {}", COMMANDS.join(", ")))?;

    tracing::info!(db_path = %db_path, command = %command, "{}", school_ops_engine::APP_NAME);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let api = &state.school_api;

    let output = match command.as_str() {
        "auto-allocate" => {
            let report = api.auto_allocate()?;
            for slot in &report.pending {
                tracing::warn!(
                    class_name = %slot.class_name,
                    subject = %slot.subject,
                    "{}",
                    i18n::t(slot.reason.label_key())
                );
            }
            if !report.pending.is_empty() {
                let count = report.pending.len().to_string();
                tracing::warn!(
                    "{}",
                    i18n::t_with_args("allocation.pending_summary", &[("count", &count)])
                );
            }
            serde_json::to_value(report)?
        }
        "houses" => {
            let board = api.house_leaderboard()?;
            for standing in &board {
                tracing::info!(
                    rank = standing.rank,
                    total = standing.stats.total,
                    "{}",
                    i18n::t(standing.house.label_key())
                );
            }
            serde_json::to_value(board)?
        }
        "workloads" => {
            let band = match args.get(1) {
                Some(raw) => Some(
                    LoadBand::parse(raw).with_context(|| format!("未知负载档位: {}", raw))?,
                ),
                None => None,
            };
            let summaries = api.teacher_workloads(band)?;
            for summary in summaries.iter().filter(|s| s.band != LoadBand::Optimal) {
                tracing::info!(
                    teacher_code = %summary.teacher_code,
                    load = summary.load,
                    "{}",
                    i18n::t(summary.band.label_key())
                );
            }
            serde_json::to_value(summaries)?
        }
        "coverage" => serde_json::to_value(api.coverage()?)?,
        "curriculum" => {
            let snapshot = api.snapshot()?;
            let mut checks = Vec::with_capacity(snapshot.classes.len());
            for class in &snapshot.classes {
                let check = api.validate_curriculum(&class.id)?;
                if !check.is_valid {
                    let current = check.current_total.to_string();
                    let target = class.total_periods_per_week.to_string();
                    let message = i18n::t_with_args(
                        "curriculum.mismatch",
                        &[("current", &current), ("target", &target)],
                    );
                    tracing::warn!(class_name = %class.display_name(), "{}", message);
                }
                checks.push(json!({
                    "classId": class.id,
                    "className": class.display_name(),
                    "target": class.total_periods_per_week,
                    "check": check,
                }));
            }
            serde_json::Value::Array(checks)
        }
        other => bail!("未知命令: {}，可用命令: {}", other, COMMANDS.join(", ")),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
