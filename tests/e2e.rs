use std::process::Command;

fn run(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_price-eng"))
        .args(args.iter().map(|fixture| format!("tests/fixtures/{fixture}")))
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn resolves_sample_requests() {
    let (stdout, stderr, success) = run(&["rules.csv", "customers.csv", "requests.csv"]);

    assert!(success);
    assert!(stderr.is_empty());

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "product_id,price,price_type,error");
    assert_eq!(lines[1], "P001,95.00,TIER,");
    assert_eq!(lines[2], "P002,5.00,CUSTOMER,");
    assert_eq!(
        lines[3],
        "P003,,,\"quantity must be greater than zero, got 0\""
    );
    assert_eq!(lines[4], "P005,,,no price found for P005 with quantity 2");
    assert_eq!(lines.len(), 5);
}

#[test]
fn bad_rows_warn_but_do_not_block() {
    let (stdout, stderr, success) = run(&[
        "rules_with_errors.csv",
        "customers.csv",
        "requests_with_errors.csv",
    ]);

    assert!(success);
    assert!(stderr.contains("is not a customer id"));
    assert!(stderr.contains("failed to parse row"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "product_id,price,price_type,error");
    assert_eq!(lines[1], "P001,120.00,NORMAL,");
    assert_eq!(lines[2], "widget,,,invalid product id: widget");
    // unparsable row is reported in place, not dropped
    assert!(lines[3].starts_with("P001,,,"));
    assert!(lines[3].contains("line 4: failed to parse row"));
    assert_eq!(lines[4], "P001,120.00,NORMAL,");
    assert_eq!(lines.len(), 5);
}

#[test]
fn missing_file_fails() {
    let (_, stderr, success) = run(&["missing.csv", "customers.csv", "requests.csv"]);

    assert!(!success);
    assert!(stderr.contains("failed to open"));
}

#[test]
fn missing_arguments_print_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_price-eng"))
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: price-eng"));
}
