use std::process::{Command, Output};

#[cfg(target_family = "unix")]
const PFDD: &str = "./target/debug/pfdd";

#[cfg(target_family = "windows")]
const PFDD: &str = ".\\target\\debug\\pfdd.exe";

fn to_args(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

fn call_pfdd(args: &str) -> Output {
    Command::new(PFDD).args(to_args(args)).output().expect("error calling pfdd exe")
}

fn test_pfdd_call(args: &str, expected_stdout: &str) {
    let output = call_pfdd(args);
    assert!(output.status.success(), "pfdd exited with {:?}: {}", output.status, String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_stdout);
}

macro_rules! test_pfdd {
    ($fn_name:ident, $args:literal, $expected:expr) => {
        #[test]
        fn $fn_name() {
            test_pfdd_call($args, $expected);
        }
    };
}

// Scenario A: domination collapse to the shortest Full rule.
test_pfdd!(scenario_a_domination_collapse, "--dedup tests/fixtures/scenario_a_dedup.txt", "||example.com^\n");

// Scenario C: multi-TLD ordering (TLD lexicographic, then subtree lexicographic).
test_pfdd!(
    scenario_c_multi_tld_ordering,
    "--dedup tests/fixtures/scenario_c_dedup.txt",
    "||a.com^\n||z.com^\n||a.net^\n"
);

// Scenario D: diff with suffix domination.
test_pfdd!(
    scenario_d_diff_suffix_domination,
    "--diff -a tests/fixtures/scenario_d_a.txt -b tests/fixtures/scenario_d_b.txt",
    " b||example.com^\n-a||ads.example.com^\n"
);

// Scenario E: diff with pure add/remove and a neutral line.
test_pfdd!(
    scenario_e_diff_add_remove_neutral,
    "--diff -a tests/fixtures/scenario_e_a.txt -b tests/fixtures/scenario_e_b.txt",
    "+a||alpha.com^\n b||beta.com^\n  ||gamma.com^\n"
);

// Scenario F: single-file carry-over of header/comment lines.
test_pfdd!(
    scenario_f_single_file_carry_over,
    "--dedup tests/fixtures/scenario_f_dedup.txt",
    "[Adblock Plus]\n! title\n||a.com^\n||b.com^\n"
);

#[test]
fn dedup_is_idempotent() {
    let first = call_pfdd("--dedup tests/fixtures/scenario_a_dedup.txt");
    assert!(first.status.success());

    let roundtrip = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(roundtrip.path(), &first.stdout).unwrap();

    let second = Command::new(PFDD)
        .args(["--dedup", roundtrip.path().to_str().unwrap()])
        .output()
        .expect("error calling pfdd exe");

    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_mode_flag_is_an_argument_error() {
    let output = call_pfdd("tests/fixtures/scenario_a_dedup.txt");
    assert!(!output.status.success());
}

#[test]
fn nonexistent_input_path_is_an_io_error() {
    let output = call_pfdd("--dedup tests/fixtures/does_not_exist.txt");
    assert!(!output.status.success());
}
