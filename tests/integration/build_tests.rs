//! End-to-end graph builds over the hr_schema fixture

use pretty_assertions::assert_eq;
use rust_dbgraph::render::DotStyle;
use rust_dbgraph::{build_graph, load_catalog, GraphOptions, InputSource};

use crate::common::{link_strings, TestContext};

// ============================================================================
// Catalog loading
// ============================================================================

#[test]
fn test_fixture_catalog_loads() {
    let ctx = TestContext::with_fixture("hr_schema");
    let catalog = load_catalog(&ctx.files_input(&[])).unwrap();

    assert_eq!(catalog.tables.len(), 4);
    let names: Vec<&str> = catalog.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["PKG_EMP", "PKG_SAL", "V_EMP_MGR"]);
    assert!(catalog.sources.iter().all(|s| s.kind == "SQL"));
}

#[test]
fn test_missing_sources_dir_fails() {
    let ctx = TestContext::with_fixture("hr_schema");
    let input = InputSource::Files {
        tables: ctx.tables_path(),
        sources_dir: ctx.root_dir.join("missing"),
        patterns: vec![],
    };
    let err = load_catalog(&input).unwrap_err();
    assert!(err.to_string().contains("Source directory not found"));
}

#[test]
fn test_invalid_tables_json_fails() {
    let ctx = TestContext::with_fixture("hr_schema");
    std::fs::write(ctx.tables_path(), "{ not json").unwrap();
    let err = load_catalog(&ctx.files_input(&[])).unwrap_err();
    assert!(err.to_string().contains("Failed to decode tables"));
}

// ============================================================================
// Graph inference
// ============================================================================

#[test]
fn test_fixture_links() {
    let ctx = TestContext::with_fixture("hr_schema");
    let result = ctx.render(ctx.files_input(&[]), DotStyle::Record);

    assert_eq!(
        link_strings(&result.graph),
        vec![
            "T_DEPT.DEPTNO = T_EMP.DEPTNO",
            "T_EMP.GRADE = T_SALGRADE.GRADE",
        ]
    );
    assert_eq!(
        result.graph.used_tables.iter().cloned().collect::<Vec<_>>(),
        vec!["T_DEPT", "T_EMP", "T_SALGRADE"]
    );
}

#[test]
fn test_fixture_record_dot() {
    let ctx = TestContext::with_fixture("hr_schema");
    let result = ctx.render(ctx.files_input(&[]), DotStyle::Record);

    let expected = "graph tables {
\tnode [shape=record];
\ttable_T_DEPT [label=\"{T_DEPT|<DEPTNO> DEPTNO NUMBER|<DNAME> DNAME VARCHAR2|<LOC> LOC VARCHAR2}\"];
\ttable_T_EMP [label=\"{T_EMP|<EMPNO> EMPNO NUMBER|<ENAME> ENAME VARCHAR2|<MGR> MGR NUMBER|<SAL> SAL NUMBER|<GRADE> GRADE VARCHAR2|<DEPTNO> DEPTNO NUMBER}\"];
\ttable_T_SALGRADE [label=\"{T_SALGRADE|<GRADE> GRADE VARCHAR2|<LOSAL> LOSAL NUMBER|<HISAL> HISAL NUMBER}\"];

\ttable_T_DEPT:\"DEPTNO\" -- table_T_EMP:\"DEPTNO\";
\ttable_T_EMP:\"GRADE\" -- table_T_SALGRADE:\"GRADE\";
}
";
    assert_eq!(result.dot, expected);
}

#[test]
fn test_fixture_html_dot() {
    let ctx = TestContext::with_fixture("hr_schema");
    let result = ctx.render(ctx.files_input(&[]), DotStyle::Html);

    assert!(result.dot.contains("\ttable_T_SALGRADE [shape=none, margin=0, label=<\n"));
    assert!(result.dot.contains("<b>T_salgrade</b>"));
    assert!(result.dot.contains(r#"PORT="HISAL">HISAL NUMBER</td>"#));
    assert!(!result.dot.contains("T_AUDIT"));
}

#[test]
fn test_commented_out_join_is_ignored() {
    let ctx = TestContext::with_fixture("hr_schema");
    let result = ctx.render(ctx.files_input(&[]), DotStyle::Record);

    // Both comments in pkg_emp.sql join T_AUDIT
    assert!(!result.graph.used_tables.contains("T_AUDIT"));
}

#[test]
fn test_extra_pattern_picks_up_more_sources() {
    let ctx = TestContext::with_fixture("hr_schema");
    let result = ctx.render(ctx.files_input(&["*.sql", "*.TXT"]), DotStyle::Record);

    assert!(link_strings(&result.graph).contains(&"T_AUDIT.ID = T_EMP.EMPNO".to_string()));
    assert!(result.dot.contains("table_T_AUDIT [label="));
}

#[test]
fn test_rebuild_is_deterministic() {
    let ctx = TestContext::with_fixture("hr_schema");
    let first = ctx.render(ctx.files_input(&[]), DotStyle::Record);
    let second = ctx.render(ctx.files_input(&[]), DotStyle::Record);
    assert_eq!(first.dot, second.dot);
}

#[test]
fn test_lowercase_catalog_names() {
    let ctx = TestContext::new();
    ctx.write_tables(&[
        ("emp", vec![("id", "NUMBER"), ("dept_id", "NUMBER")]),
        ("dept", vec![("id", "NUMBER")]),
    ]);
    ctx.write_source(
        "p.pck",
        "select 1 from emp e, dept d where e.dept_id = d.id;",
    );

    let result = ctx.render(ctx.files_input(&["*.pck"]), DotStyle::Record);
    assert_eq!(link_strings(&result.graph), vec!["DEPT.ID = EMP.DEPT_ID"]);
    assert!(result.dot.contains("\ttable_EMP [label=\"{emp|<ID> id NUMBER|<DEPT_ID> DEPT_id NUMBER}\"];\n"));
}

#[test]
fn test_latin1_source_file() {
    let ctx = TestContext::new();
    ctx.write_tables(&[
        ("A", vec![("ID", "NUMBER")]),
        ("B", vec![("A_ID", "NUMBER")]),
    ]);
    let dir = ctx.sources_dir();
    std::fs::create_dir_all(&dir).unwrap();
    // "-- Übersicht" in Windows-1252, followed by a join
    let mut bytes = b"-- \xDCbersicht\n".to_vec();
    bytes.extend_from_slice(b"SELECT 1 FROM a x, b y WHERE x.id = y.a_id;");
    std::fs::write(dir.join("legacy.sql"), bytes).unwrap();

    let graph = build_graph(GraphOptions {
        input: ctx.files_input(&[]),
        output_path: Some(ctx.root_dir.join("graph.dot")),
        save_archive: None,
        style: DotStyle::Record,
    })
    .unwrap();
    assert_eq!(link_strings(&graph), vec!["A.ID = B.A_ID"]);
}
