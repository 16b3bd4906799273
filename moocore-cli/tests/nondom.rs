use assert_cmd::Command;

const MASK_STR: &str = "point  nondominated \n------+-------------\n    0          true \n    1          true \n    2          true \n    3         false \n";

#[test]
fn filters_dominated_points() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["nondom", "tests/data/dominated.txt"])
        .assert()
        .success()
        .stdout(MASK_STR);
}
