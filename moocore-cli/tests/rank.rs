use assert_cmd::Command;

const RANK_STR: &str = "point  rank \n------+-----\n    0     0 \n    1     0 \n    2     0 \n    3     1 \n";

#[test]
fn assigns_pareto_rank() {
    Command::cargo_bin("moocore")
        .unwrap()
        .args(["rank", "tests/data/dominated.txt"])
        .assert()
        .success()
        .stdout(RANK_STR);
}
