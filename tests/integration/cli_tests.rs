//! Command-line interface tests

use std::path::Path;
use std::process::{Command, Output};

use crate::common::TestContext;

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rust-dbgraph"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run rust-dbgraph")
}

#[test]
fn test_help_lists_subcommands() {
    let ctx = TestContext::new();
    let output = run(&["--help"], &ctx.root_dir);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("render"));
    assert!(stdout.contains("pack"));
}

#[test]
fn test_render_files_to_stdout() {
    let ctx = TestContext::with_fixture("hr_schema");
    let output = run(
        &["render", "--tables", "tables.json", "--sources", "sources"],
        &ctx.root_dir,
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("graph tables {\n"));
    assert!(stdout.contains("\ttable_T_DEPT:\"DEPTNO\" -- table_T_EMP:\"DEPTNO\";\n"));
    assert!(stdout.ends_with("}\n"));
}

#[test]
fn test_pack_then_render_archive() {
    let ctx = TestContext::with_fixture("hr_schema");

    let packed = run(
        &[
            "pack", "--tables", "tables.json", "--sources", "sources", "-o", "hr.zip",
        ],
        &ctx.root_dir,
    );
    assert!(packed.status.success());
    assert!(ctx.root_dir.join("hr.zip").exists());

    let rendered = run(
        &["render", "--archive", "hr.zip", "--html", "-o", "graph.dot"],
        &ctx.root_dir,
    );
    assert!(rendered.status.success());
    assert!(rendered.stdout.is_empty());

    let dot = std::fs::read_to_string(ctx.root_dir.join("graph.dot")).unwrap();
    assert!(dot.contains("shape=none, margin=0"));
}

#[test]
fn test_render_requires_input() {
    let ctx = TestContext::new();
    let output = run(&["render"], &ctx.root_dir);
    assert!(!output.status.success());
}

#[test]
fn test_render_archive_conflicts_with_files() {
    let ctx = TestContext::with_fixture("hr_schema");
    let output = run(
        &[
            "render", "--archive", "hr.zip", "--tables", "tables.json", "--sources", "sources",
        ],
        &ctx.root_dir,
    );
    assert!(!output.status.success());
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let ctx = TestContext::with_fixture("hr_schema");
    let output = run(
        &["-v", "render", "--tables", "tables.json", "--sources", "sources"],
        &ctx.root_dir,
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.starts_with("graph tables {"));
    assert!(stderr.contains("inferred join graph"));
}

#[test]
fn test_missing_tables_file_reports_error() {
    let ctx = TestContext::with_fixture("hr_schema");
    let output = run(
        &["render", "--tables", "nope.json", "--sources", "sources"],
        &ctx.root_dir,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
