//! Human-readable rendering of execution results, validation reports, and
//! config listings.

use rcr_core::{GroupExecutionResult, RunnerConfig};
use rcr_engine::GroupValidationReport;

pub fn render_group_result(result: &GroupExecutionResult) -> String {
    let mut buf = String::new();
    let status = if result.is_success() { "ok" } else { "FAILED" };
    buf.push_str(&format!(
        "group {} [{status}] ({} ms)\n",
        result.group,
        result.duration.as_millis()
    ));
    for command in &result.commands {
        buf.push_str(&format!("  {} -> exit {}\n", command.name, command.exit_code));
        if !command.stderr.is_empty() {
            buf.push_str(&format!("    stderr: {}\n", command.stderr.trim_end()));
        }
    }
    if let Some(msg) = &result.error_msg {
        buf.push_str(&format!("  error: {msg}\n"));
    }
    buf
}

pub fn render_validation_report(report: &GroupValidationReport) -> String {
    let mut buf = String::new();
    buf.push_str(&format!(
        "group {} [ok] ({} file(s) verified)\n",
        report.group, report.files_verified
    ));
    for command in &report.commands {
        buf.push_str(&format!(
            "  {} -> {} (cwd {})\n",
            command.name,
            command.resolved_cmd,
            command.work_dir.display()
        ));
    }
    buf
}

pub fn render_config_list(config: &RunnerConfig) -> String {
    let mut buf = String::new();
    for group in &config.groups {
        buf.push_str(&format!("{}\n", group.name));
        if let Some(description) = &group.description {
            buf.push_str(&format!("  {description}\n"));
        }
        for command in &group.commands {
            buf.push_str(&format!("  - {} ({})\n", command.name, command.cmd));
        }
    }
    buf
}
