use assert_cmd::Command;

#[test]
fn halton_weyl_is_close_to_exact_hypervolume() {
    let output = Command::cargo_bin("moocore")
        .unwrap()
        .args(["approx", "tests/data/points.txt", "--reference", "6,6", "--nsamples", "200000"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: f64 = String::from_utf8(output).unwrap().trim().parse().unwrap();
    assert!((value - 17.0).abs() / 17.0 < 0.05);
}

#[test]
fn monte_carlo_is_reproducible_for_a_fixed_seed() {
    let run = || {
        Command::cargo_bin("moocore")
            .unwrap()
            .args([
                "approx",
                "tests/data/points.txt",
                "--reference",
                "6,6",
                "--method",
                "mc",
                "--seed",
                "11",
                "--nsamples",
                "1000",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}
