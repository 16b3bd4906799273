use assert_cmd::Command;

const CONTRIBUTIONS_STR: &str = "point  contribution \n------+-------------\n    0    1.000000e0 \n    1    4.000000e0 \n    2    4.000000e0 \n";

#[test]
fn total() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["hv", "tests/data/points.txt", "--reference", "6,6"])
        .assert()
        .success()
        .stdout("1.700000e1\n");
}

#[test]
fn contributions() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["hv", "tests/data/points.txt", "--reference", "6,6", "--contributions"])
        .assert()
        .success()
        .stdout(CONTRIBUTIONS_STR);
}

#[test]
fn digits_narrows_precision() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["--digits", "2", "hv", "tests/data/points.txt", "--reference", "6,6"])
        .assert()
        .success()
        .stdout("1.70e1\n");
}

#[test]
fn missing_reference_fails() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["hv", "tests/data/points.txt"])
        .assert()
        .failure();
}

#[test]
fn missing_file_fails() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["hv", "tests/data/does-not-exist.txt", "--reference", "6,6"])
        .assert()
        .failure();
}
