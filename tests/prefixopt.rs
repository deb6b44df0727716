use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/*-------------------------------------------------------------------------------------------------
  prefixopt Binary Tests
-------------------------------------------------------------------------------------------------*/

fn prefixopt() -> Command {
    Command::cargo_bin("prefixopt").unwrap()
}

fn temp_list(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/*--------------------------------------------------------------------------------------
  Version
--------------------------------------------------------------------------------------*/

#[test]
fn command_version() {
    prefixopt().arg("--version").assert().success();
}

/*--------------------------------------------------------------------------------------
  Optimize
--------------------------------------------------------------------------------------*/

#[test]
fn command_optimize_stdin() {
    prefixopt()
        .arg("optimize")
        .write_stdin("10.0.1.0/24\n10.0.0.0/24\n10.0.0.5/32\n")
        .assert()
        .success()
        .stdout("10.0.0.0/23\n");
}

#[test]
fn command_optimize_file_with_free_text() {
    let file = temp_list(
        "# access list\n\
         permit ip 10.0.0.0/24 any\n\
         permit ip 10.0.1.0/24 any # adjacent\n\
         \n\
         192.168.1.1\n",
    );

    prefixopt()
        .arg("optimize")
        .arg(file.path())
        .assert()
        .success()
        .stdout("10.0.0.0/23\n192.168.1.1/32\n");
}

#[test]
fn command_optimize_csv_format() {
    prefixopt()
        .arg("optimize")
        .arg("--format")
        .arg("csv")
        .write_stdin("10.0.0.0/24\n10.0.1.0/24\n192.168.0.0/16\n")
        .assert()
        .success()
        .stdout("10.0.0.0/23,192.168.0.0/16\n");
}

#[test]
fn command_optimize_ipv4_only() {
    prefixopt()
        .arg("optimize")
        .arg("--ipv4-only")
        .write_stdin("2001:db8::/32\n10.0.0.0/8\n")
        .assert()
        .success()
        .stdout("10.0.0.0/8\n");
}

#[test]
fn command_optimize_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("result.txt");

    prefixopt()
        .arg("optimize")
        .arg("--output")
        .arg(&out_path)
        .write_stdin("10.0.0.0/24\n10.0.1.0/24\n")
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, "10.0.0.0/23\n");
}

#[test]
fn command_optimize_leading_zero_octets() {
    prefixopt()
        .arg("optimize")
        .write_stdin("010.0.0.1\n")
        .assert()
        .success()
        .stdout("10.0.0.1/32\n");
}

/*--------------------------------------------------------------------------------------
  Merge
--------------------------------------------------------------------------------------*/

#[test]
fn command_merge_two_files() {
    let file_a = temp_list("10.0.0.0/24\n");
    let file_b = temp_list("10.0.1.0/24\n10.0.0.0/24\n");

    prefixopt()
        .arg("merge")
        .arg(file_a.path())
        .arg(file_b.path())
        .assert()
        .success()
        .stdout("10.0.0.0/23\n");
}

#[test]
fn command_merge_keep_comments() {
    let file_a = temp_list("10.0.0.0/8 # corporate\n10.1.0.0/16\n");
    let file_b = temp_list("10.1.0.0/16 # branch office\n");

    prefixopt()
        .arg("merge")
        .arg("--keep-comments")
        .arg(file_a.path())
        .arg(file_b.path())
        .assert()
        .success()
        // Nested entries survive; the commented duplicate wins.
        .stdout("10.0.0.0/8 # corporate\n10.1.0.0/16 # branch office\n");
}

#[test]
fn command_keep_comments_rejects_csv_format() {
    let file = temp_list("10.0.0.0/8\n");

    prefixopt()
        .arg("merge")
        .arg("--keep-comments")
        .arg("--format")
        .arg("csv")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("keep-comments"));
}

/*--------------------------------------------------------------------------------------
  Add
--------------------------------------------------------------------------------------*/

#[test]
fn command_add_prefixes() {
    let file = temp_list("10.0.0.0/24\n");

    prefixopt()
        .arg("add")
        .arg(file.path())
        .arg("10.0.1.0/24")
        .assert()
        .success()
        .stdout("10.0.0.0/23\n");
}

#[test]
fn command_add_keep_comments_annotates() {
    let file = temp_list("10.0.0.0/24\n");

    prefixopt()
        .arg("add")
        .arg("--keep-comments")
        .arg(file.path())
        .arg("192.168.0.0/16")
        .assert()
        .success()
        .stdout("10.0.0.0/24\n192.168.0.0/16 # Added manually\n");
}

#[test]
fn command_add_invalid_prefix_is_fatal() {
    let file = temp_list("10.0.0.0/24\n");

    prefixopt()
        .arg("add")
        .arg(file.path())
        .arg("not-a-prefix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP prefix"));
}

/*--------------------------------------------------------------------------------------
  Filter
--------------------------------------------------------------------------------------*/

#[test]
fn command_filter_bogons() {
    prefixopt()
        .arg("filter")
        .arg("--bogons")
        .write_stdin("8.8.8.8/32\n192.168.1.0/24\n1.1.1.1/32\n")
        .assert()
        .success()
        .stdout("8.8.8.8/32\n1.1.1.1/32\n");
}

#[test]
fn command_filter_single_category() {
    prefixopt()
        .arg("filter")
        .arg("--no-private")
        .write_stdin("10.1.2.3/32\n127.0.0.1/32\n8.8.8.8/32\n")
        .assert()
        .success()
        .stdout("127.0.0.1/32\n8.8.8.8/32\n");
}

/*--------------------------------------------------------------------------------------
  Intersect
--------------------------------------------------------------------------------------*/

#[test]
fn command_intersect_table() {
    let file_a = temp_list("10.0.0.0/8\n");
    let file_b = temp_list("10.1.0.0/16\n");

    prefixopt()
        .arg("intersect")
        .arg(file_a.path())
        .arg(file_b.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("10.1.0.0/16"))
        .stdout(predicate::str::contains("partial"));
}

#[test]
fn command_intersect_quiet_lists_prefixes() {
    let file_a = temp_list("10.0.0.0/24\n");
    let file_b = temp_list("10.0.0.0/24\n192.168.0.0/16\n");

    prefixopt()
        .arg("intersect")
        .arg("--quiet")
        .arg(file_a.path())
        .arg(file_b.path())
        .assert()
        .success()
        .stdout("10.0.0.0/24\n");
}

#[test]
fn command_intersect_disjoint() {
    let file_a = temp_list("10.0.0.0/8\n");
    let file_b = temp_list("192.168.0.0/16\n");

    prefixopt()
        .arg("intersect")
        .arg(file_a.path())
        .arg(file_b.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No intersecting prefixes"));
}

/*--------------------------------------------------------------------------------------
  Exclude
--------------------------------------------------------------------------------------*/

#[test]
fn command_exclude_single_address() {
    prefixopt()
        .arg("exclude")
        .arg("-x")
        .arg("10.0.0.3/32")
        .write_stdin("10.0.0.0/29\n")
        .assert()
        .success()
        .stdout("10.0.0.0/31\n10.0.0.2/32\n10.0.0.4/30\n");
}

#[test]
fn command_exclude_from_file() {
    let source = temp_list("10.0.0.0/24\n");
    let holes = temp_list("10.0.0.0/26\n10.0.0.192/26\n");

    prefixopt()
        .arg("exclude")
        .arg("-x")
        .arg(holes.path())
        .arg(source.path())
        .assert()
        .success()
        .stdout("10.0.0.64/26\n10.0.0.128/26\n");
}

#[test]
fn command_exclude_invalid_target_is_fatal() {
    prefixopt()
        .arg("exclude")
        .arg("-x")
        .arg("no-such-file-or-prefix")
        .write_stdin("10.0.0.0/24\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP prefix"));
}

/*--------------------------------------------------------------------------------------
  Diff
--------------------------------------------------------------------------------------*/

#[test]
fn command_diff_changes() {
    let new_file = temp_list("10.0.0.0/8\n2.2.2.2/32\n");
    let old_file = temp_list("10.0.0.0/8\n1.1.1.1/32\n");

    prefixopt()
        .arg("diff")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success()
        .stdout("+ 2.2.2.2/32\n- 1.1.1.1/32\n");
}

#[test]
fn command_diff_semantic_equality() {
    // Two /24s cover the same space as the /23: no changes.
    let new_file = temp_list("192.168.0.0/24\n192.168.1.0/24\n");
    let old_file = temp_list("192.168.0.0/23\n");

    prefixopt()
        .arg("diff")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn command_diff_mode_all() {
    let new_file = temp_list("10.0.0.0/8\n2.2.2.2/32\n");
    let old_file = temp_list("10.0.0.0/8\n1.1.1.1/32\n");

    prefixopt()
        .arg("diff")
        .arg("--mode")
        .arg("all")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success()
        .stdout("+ 2.2.2.2/32\n- 1.1.1.1/32\n= 10.0.0.0/8\n");
}

#[test]
fn command_diff_summary() {
    let new_file = temp_list("10.0.0.0/8\n2.2.2.2/32\n");
    let old_file = temp_list("10.0.0.0/8\n1.1.1.1/32\n");

    prefixopt()
        .arg("diff")
        .arg("--summary")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success()
        .stdout("added:     1\nremoved:   1\nunchanged: 1\n");
}

#[test]
fn command_diff_ipv6_only() {
    let new_file = temp_list("10.0.0.0/8\n2001:db8::/32\n");
    let old_file = temp_list("172.16.0.0/12\n2001:db8::/32\n");

    // The IPv4 churn is invisible with the family filter on.
    prefixopt()
        .arg("diff")
        .arg("--ipv6-only")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn command_diff_output_file() {
    let new_file = temp_list("10.0.0.0/8\n2.2.2.2/32\n");
    let old_file = temp_list("10.0.0.0/8\n");
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("changes.txt");

    prefixopt()
        .arg("diff")
        .arg("--output")
        .arg(&out_path)
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, "+ 2.2.2.2/32\n");
}

#[test]
fn command_diff_rejects_csv_format() {
    let new_file = temp_list("10.0.0.0/8\n");
    let old_file = temp_list("10.0.0.0/8\n");

    prefixopt()
        .arg("diff")
        .arg("--format")
        .arg("csv")
        .arg(new_file.path())
        .arg(old_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("csv"));
}

/*--------------------------------------------------------------------------------------
  Check
--------------------------------------------------------------------------------------*/

#[test]
fn command_check_covered() {
    let file = temp_list("10.0.0.0/16\n10.0.5.0/24\n192.168.0.0/16\n");

    prefixopt()
        .arg("check")
        .arg("10.0.5.10")
        .arg(file.path())
        .assert()
        .success()
        .stdout("10.0.0.0/16\n10.0.5.0/24\n");
}

#[test]
fn command_check_not_covered() {
    let file = temp_list("10.0.0.0/16\n");

    prefixopt()
        .arg("check")
        .arg("172.16.0.1")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("not covered"));
}

/*--------------------------------------------------------------------------------------
  Split
--------------------------------------------------------------------------------------*/

#[test]
fn command_split_prefix() {
    prefixopt()
        .arg("split")
        .arg("26")
        .arg("10.0.0.0/24")
        .assert()
        .success()
        .stdout("10.0.0.0/26\n10.0.0.64/26\n10.0.0.128/26\n10.0.0.192/26\n");
}

#[test]
fn command_split_invalid_length() {
    prefixopt()
        .arg("split")
        .arg("16")
        .arg("10.0.0.0/24")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid target prefix length"));
}

#[test]
fn command_split_too_many_subnets() {
    prefixopt()
        .arg("split")
        .arg("32")
        .arg("10.0.0.0/8")
        .assert()
        .failure()
        .stderr(predicate::str::contains("subnets"));
}

/*--------------------------------------------------------------------------------------
  Stats
--------------------------------------------------------------------------------------*/

#[test]
fn command_stats() {
    prefixopt()
        .arg("stats")
        .write_stdin("10.0.0.0/24\n10.0.1.0/24\n10.0.0.5/32\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("512"))
        .stdout(predicate::str::contains("3.00"));
}

#[test]
fn command_stats_details() {
    prefixopt()
        .arg("stats")
        .arg("--details")
        .write_stdin("10.0.0.0/8\n2001:db8::/32\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("IPv4 prefixes"))
        .stdout(predicate::str::contains("IPv6 prefixes"));
}

/*--------------------------------------------------------------------------------------
  Input Formats
--------------------------------------------------------------------------------------*/

#[test]
fn command_reads_csv_prefix_column() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"prefix,owner\n10.0.0.0/24,alice\n10.0.1.0/24,bob\n")
        .unwrap();

    prefixopt()
        .arg("optimize")
        .arg(file.path())
        .assert()
        .success()
        .stdout("10.0.0.0/23\n");
}

#[test]
fn command_reads_json_prefixes_array() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"prefixes": ["10.0.0.0/24", "10.0.1.0/24"]}"#)
        .unwrap();

    prefixopt()
        .arg("optimize")
        .arg(file.path())
        .assert()
        .success()
        .stdout("10.0.0.0/23\n");
}
