use assert_cmd::Command;

const LEVEL_50_STR: &str = "      level 50% \n----------------------\n1.000000e0 5.000000e0 \n2.000000e0 4.000000e0 \n3.000000e0 2.000000e0 \n4.000000e0 1.000000e0 \n\n";

#[test]
fn selected_percentile() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["eaf", "tests/data/sets.txt", "--percentiles", "50"])
        .assert()
        .success()
        .stdout(LEVEL_50_STR);
}

#[test]
fn requires_at_least_two_sets() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["eaf", "tests/data/points.txt"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("at least two"));
}
