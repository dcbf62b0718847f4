use anyhow::Result;
use ddlsort::types::ReorderSummary;
use ddlsort::{process_sql, DdlSortError, ReorderOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SHOP_DDL: &str = "\
-- generated by a dump tool
SET FOREIGN_KEY_CHECKS = 0;
CREATE TABLE `orders` (
  `id` INT NOT NULL,
  `customer_id` INT NOT NULL,
  PRIMARY KEY (`id`),
  CONSTRAINT `fk_orders_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`)
);

CREATE TABLE `customers` (
  `id` INT NOT NULL,
  PRIMARY KEY (`id`)
);
";

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write test input");
    path
}

fn block_index(output: &str, table: &str) -> usize {
    output
        .find(&format!("CREATE TABLE `{}`", table))
        .or_else(|| output.find(&format!("CREATE TABLE {}", table)))
        .unwrap_or_else(|| panic!("no block for {} in output:\n{}", table, output))
}

fn run_binary(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ddlsort"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run ddlsort binary")
}

#[test]
fn test_referenced_table_written_first() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "shop.sql", SHOP_DDL);
    let output = dir.path().join("ordered.sql");

    let summary = process_sql(&ReorderOptions::new(&input).with_output(&output))?;
    let written = fs::read_to_string(&output)?;

    assert!(block_index(&written, "customers") < block_index(&written, "orders"));
    assert_eq!(summary.sorted_order, vec!["customers", "orders"]);
    assert_eq!(summary.tables, vec!["orders", "customers"]);
    assert_eq!(summary.foreign_key_count, 1);
    assert_eq!(summary.tables_written, 2);
    Ok(())
}

#[test]
fn test_preamble_dropped_by_default() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "shop.sql", SHOP_DDL);
    let output = dir.path().join("ordered.sql");

    let summary = process_sql(&ReorderOptions::new(&input).with_output(&output))?;
    let written = fs::read_to_string(&output)?;

    assert!(written.starts_with("CREATE TABLE `customers`"));
    assert!(!written.contains("SET FOREIGN_KEY_CHECKS"));
    assert_eq!(summary.preamble_lines, 2);
    assert!(!summary.preamble_kept);
    Ok(())
}

#[test]
fn test_keep_preamble_option() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "shop.sql", SHOP_DDL);
    let output = dir.path().join("ordered.sql");

    process_sql(
        &ReorderOptions::new(&input)
            .with_output(&output)
            .with_keep_preamble(true),
    )?;
    let written = fs::read_to_string(&output)?;

    assert!(written.starts_with(
        "-- generated by a dump tool\nSET FOREIGN_KEY_CHECKS = 0;\nCREATE TABLE `customers`"
    ));
    Ok(())
}

#[test]
fn test_already_ordered_input_is_unchanged() -> Result<()> {
    let ddl = "\
CREATE TABLE regions (
  id INT PRIMARY KEY
);
CREATE TABLE stores (
  id INT PRIMARY KEY,
  region_id INT,
  FOREIGN KEY (region_id) REFERENCES regions(id)
);
CREATE TABLE employees (
  id INT PRIMARY KEY,
  store_id INT,
  FOREIGN KEY (store_id) REFERENCES stores(id)
);
";
    let dir = TempDir::new()?;
    let input = write_input(&dir, "ordered.sql", ddl);
    let output = dir.path().join("out.sql");

    process_sql(&ReorderOptions::new(&input).with_output(&output))?;
    assert_eq!(fs::read_to_string(&output)?, ddl);
    Ok(())
}

#[test]
fn test_output_is_a_fixed_point() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "shop.sql", SHOP_DDL);
    let first = dir.path().join("first.sql");
    let second = dir.path().join("second.sql");

    process_sql(&ReorderOptions::new(&input).with_output(&first))?;
    let summary = process_sql(&ReorderOptions::new(&first).with_output(&second))?;

    assert_eq!(fs::read_to_string(&first)?, fs::read_to_string(&second)?);
    assert_eq!(summary.preamble_lines, 0);
    Ok(())
}

#[test]
fn test_cycle_fails_without_output() -> Result<()> {
    let ddl = "\
CREATE TABLE a (
  b_id INT,
  FOREIGN KEY (b_id) REFERENCES b(id)
);
CREATE TABLE b (
  a_id INT,
  FOREIGN KEY (a_id) REFERENCES a(id)
);
";
    let dir = TempDir::new()?;
    let input = write_input(&dir, "cycle.sql", ddl);
    let output = dir.path().join("out.sql");

    let err = process_sql(&ReorderOptions::new(&input).with_output(&output)).unwrap_err();

    assert!(matches!(err, DdlSortError::CyclicDependency { .. }));
    assert_eq!(err.cyclic_tables(), Some(&["a".to_string(), "b".to_string()][..]));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let options = ReorderOptions::new(dir.path().join("absent.sql"))
        .with_output(dir.path().join("out.sql"));

    let err = process_sql(&options).unwrap_err();
    assert!(matches!(err, DdlSortError::InputOpen { .. }));
    assert!(err.to_string().contains("absent.sql"));
}

#[test]
fn test_undeclared_parent_does_not_fail() -> Result<()> {
    let ddl = "\
CREATE TABLE invoices (
  tenant_id INT,
  FOREIGN KEY (tenant_id) REFERENCES tenants(id)
);
";
    let dir = TempDir::new()?;
    let input = write_input(&dir, "partial.sql", ddl);
    let output = dir.path().join("out.sql");

    let summary = process_sql(&ReorderOptions::new(&input).with_output(&output))?;

    assert_eq!(summary.undeclared_references, vec!["tenants"]);
    assert_eq!(summary.tables_written, 1);
    assert_eq!(fs::read_to_string(&output)?, ddl);
    Ok(())
}

#[test]
fn test_report_written_as_json() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "shop.sql", SHOP_DDL);
    let output = dir.path().join("ordered.sql");
    let report = dir.path().join("summary.json");

    process_sql(
        &ReorderOptions::new(&input)
            .with_output(&output)
            .with_report(Some(report.clone())),
    )?;

    let summary: ReorderSummary = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(summary.sorted_order, vec!["customers", "orders"]);
    assert_eq!(summary.output, output);
    Ok(())
}

#[test]
fn test_generated_acyclic_schema_respects_every_edge() -> Result<()> {
    // small LCG so the schema shape is reproducible
    let mut seed: u64 = 0x5eed;
    let mut next = move |bound: usize| {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((seed >> 33) as usize) % bound
    };

    let table_count = 30;
    let mut edges = Vec::new();
    let mut blocks = Vec::new();
    for i in 0..table_count {
        let mut block = format!("CREATE TABLE t{} (\n  id INT PRIMARY KEY", i);
        if i > 0 {
            for _ in 0..next(3) {
                let parent = next(i);
                block.push_str(&format!(
                    ",\n  FOREIGN KEY (t{}_id) REFERENCES t{}(id)",
                    parent, parent
                ));
                edges.push((parent, i));
            }
        }
        block.push_str("\n);\n");
        blocks.push(block);
    }
    // declare tables in a scrambled order
    for i in (1..blocks.len()).rev() {
        let j = next(i + 1);
        blocks.swap(i, j);
    }

    let dir = TempDir::new()?;
    let input = write_input(&dir, "generated.sql", &blocks.concat());
    let output = dir.path().join("out.sql");
    let summary = process_sql(&ReorderOptions::new(&input).with_output(&output))?;

    assert_eq!(summary.tables_written, table_count);
    let position = |name: String| {
        summary
            .sorted_order
            .iter()
            .position(|t| *t == name)
            .unwrap()
    };
    for (parent, child) in edges {
        assert!(position(format!("t{}", parent)) < position(format!("t{}", child)));
    }
    Ok(())
}

#[test]
fn test_cli_success_uses_default_output() -> Result<()> {
    let dir = TempDir::new()?;
    write_input(&dir, "shop.sql", SHOP_DDL);

    let result = run_binary(dir.path(), &["-i", "shop.sql"]);

    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("output.sql"));
    let written = fs::read_to_string(dir.path().join("output.sql"))?;
    assert!(block_index(&written, "customers") < block_index(&written, "orders"));
    Ok(())
}

#[test]
fn test_cli_print_order() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "shop.sql", SHOP_DDL);

    let result = run_binary(
        dir.path(),
        &["--input", "shop.sql", "--output", "o.sql", "--print-order"],
    );

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(&lines[..2], &["customers", "orders"]);
}

#[test]
fn test_cli_missing_input_flag_exits_one() {
    let dir = TempDir::new().unwrap();
    let result = run_binary(dir.path(), &[]);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("--input"));
}

#[test]
fn test_cli_cycle_exits_one() {
    let dir = TempDir::new().unwrap();
    write_input(
        &dir,
        "cycle.sql",
        "CREATE TABLE a (\n FOREIGN KEY (b_id) REFERENCES b(id)\n);\nCREATE TABLE b (\n FOREIGN KEY (a_id) REFERENCES a(id)\n);\n",
    );

    let result = run_binary(dir.path(), &["-i", "cycle.sql"]);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Cyclic foreign key dependency"));
    assert!(!dir.path().join("output.sql").exists());
}

#[test]
fn test_cli_unreadable_input_exits_one() {
    let dir = TempDir::new().unwrap();
    let result = run_binary(dir.path(), &["-i", "missing.sql"]);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("missing.sql"));
}

#[test]
fn test_non_utf8_input_is_reordered_byte_for_byte() -> Result<()> {
    let source: &[u8] = b"CREATE TABLE b (\n  a_id INT,\n  FOREIGN KEY (a_id) REFERENCES a(id)\n  -- caf\xE9\n);\nCREATE TABLE a (\n  id INT -- \x82\xA0\n);\n";
    let dir = TempDir::new()?;
    let input = dir.path().join("latin1.sql");
    fs::write(&input, source)?;
    let output = dir.path().join("out.sql");

    let summary = process_sql(&ReorderOptions::new(&input).with_output(&output))?;

    assert_eq!(summary.sorted_order, vec!["a", "b"]);
    assert_eq!(
        fs::read(&output)?,
        b"CREATE TABLE a (\n  id INT -- \x82\xA0\n);\nCREATE TABLE b (\n  a_id INT,\n  FOREIGN KEY (a_id) REFERENCES a(id)\n  -- caf\xE9\n);\n"
    );
    Ok(())
}

#[test]
fn test_self_referencing_table_is_a_cycle() {
    let ddl = "\
CREATE TABLE emp (
  id INT,
  m INT,
  FOREIGN KEY (m) REFERENCES emp(id)
);
";
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "emp.sql", ddl);
    let output = dir.path().join("out.sql");

    let err = process_sql(&ReorderOptions::new(&input).with_output(&output)).unwrap_err();

    assert_eq!(err.cyclic_tables(), Some(&["emp".to_string()][..]));
    assert!(!output.exists());
}

#[test]
fn test_cli_print_order_lists_only_written_tables() {
    let dir = TempDir::new().unwrap();
    write_input(
        &dir,
        "partial.sql",
        "CREATE TABLE invoices (\n  FOREIGN KEY (tenant_id) REFERENCES tenants(id)\n);\n",
    );

    let result = run_binary(dir.path(), &["-i", "partial.sql", "--print-order"]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "invoices");
    assert!(!stdout.contains("tenants"));
}
