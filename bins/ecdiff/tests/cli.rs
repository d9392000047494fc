//! Runs the binaries the way the differential harness does and checks the
//! exit code, stdout and stderr of each outcome class.
use rstest::rstest;
use serde_json::Value;
use std::process::{Command, Output};

const G1: &str = "\
    0000000000000000000000000000000000000000000000000000000000000001\
    0000000000000000000000000000000000000000000000000000000000000002";
const TWO_G1: &str = "\
    030644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd3\
    15ed738c0e0a7c92e7845f96b2ae9c0a68a6a449e3538fc7ff3ebf7a5a18a2c4";
const G2: &str = "\
    198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2\
    1800deef121f1e76426a00665e5c4479674322d4f75edadd46debd5cd992f6ed\
    090689d0585ff075ec9e99ad690c3395bc4b313370b38ef355acdadcd122975b\
    12c85ea5db8c6deb4aab71808dcb408fe3d1e7690c43d37b4ce6cc0166fa7daa";

fn bin(name: &str) -> &'static str {
    match name {
        "ecadd" => env!("CARGO_BIN_EXE_ecadd"),
        "ecmul" => env!("CARGO_BIN_EXE_ecmul"),
        "ecpairing" => env!("CARGO_BIN_EXE_ecpairing"),
        "ecdiff" => env!("CARGO_BIN_EXE_ecdiff"),
        _ => unreachable!("unknown binary {name}"),
    }
}

fn exec(name: &str, args: &[&str]) -> Output {
    Command::new(bin(name))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Runs a command expected to print one JSON line and exit with 0.
fn json(name: &str, args: &[&str]) -> Value {
    let output = exec(name, args);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(output.stderr.is_empty(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.ends_with('\n'));
    serde_json::from_str(&stdout).unwrap()
}

/// Runs a command expected to fail with exit code 1 and nothing on stdout.
fn usage_error(name: &str, args: &[&str]) -> String {
    let output = exec(name, args);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(output.stdout.is_empty(), "{output:?}");
    String::from_utf8(output.stderr).unwrap()
}

fn success(result: &str) -> Value {
    serde_json::json!({ "success": true, "result": format!("0x{result}") })
}

fn pairing_flag(value: bool) -> Value {
    success(&format!("{}{}", "0".repeat(63), value as u8))
}

#[test]
fn ecadd_doubles_the_generator() {
    assert_eq!(json("ecadd", &[&format!("0x{G1}{G1}")]), success(TWO_G1));
}

#[test]
fn ecadd_identity() {
    let zero = "0".repeat(128);
    assert_eq!(json("ecadd", &[&format!("{G1}{zero}")]), success(G1));
    assert_eq!(json("ecadd", &[&format!("0X{zero}{zero}")]), success(&zero));
}

#[rstest]
#[case::zero("00", &"0".repeat(128))]
#[case::one("01", G1)]
#[case::two("02", TWO_G1)]
fn ecmul_small_scalars(#[case] scalar: &str, #[case] expected: &str) {
    let input = format!("0x{G1}{}{scalar}", "0".repeat(62));
    assert_eq!(json("ecmul", &[&input]), success(expected));
}

#[rstest]
#[case::missing(&[])]
#[case::empty(&[""])]
#[case::prefix(&["0x"])]
fn ecpairing_empty_input(#[case] args: &[&str]) {
    assert_eq!(json("ecpairing", args), pairing_flag(true));
}

#[test]
fn ecpairing_single_pair() {
    assert_eq!(json("ecpairing", &[&format!("{G1}{G2}")]), pairing_flag(false));
}

#[rstest]
#[case::ecadd("ecadd", format!("{}{G1}", "11".repeat(64)))]
#[case::ecmul("ecmul", format!("{}{}", "11".repeat(64), "0".repeat(64)))]
#[case::ecpairing_length("ecpairing", format!("0x{G1}{G2}00"))]
#[case::ecpairing_off_twist("ecpairing", format!("{G1}{}", "11".repeat(128)))]
fn precompile_errors_are_reported_on_stdout(#[case] name: &str, #[case] input: String) {
    let result = json(name, &[&input]);
    assert_eq!(result["success"], false);
    assert_eq!(result["error_code"], "PRECOMPILE_ERROR");
    assert!(result["error"]
        .as_str()
        .unwrap()
        .starts_with("Error running precompile: "));
    assert!(result.get("result").is_none());
}

#[rstest]
#[case::ecadd_short("ecadd", "0x00", "128-byte (256 character)")]
#[case::ecmul_long("ecmul", &"0".repeat(194), "96-byte (192 character)")]
#[case::ecmul_bad_digit("ecmul", &format!("{}zz", "0".repeat(190)), "Error decoding hex input")]
#[case::ecpairing_odd("ecpairing", "0x0", "Error decoding hex input")]
fn decode_errors_exit_with_one(#[case] name: &str, #[case] input: &str, #[case] message: &str) {
    let stderr = usage_error(name, &[input]);
    assert!(stderr.contains(message), "{stderr}");
}

#[rstest]
#[case::ecadd("ecadd", &[])]
#[case::ecmul("ecmul", &[])]
#[case::extra_argument("ecpairing", &["", ""])]
#[case::unknown_subcommand("ecdiff", &["ecsub"])]
fn usage_errors_exit_with_one(#[case] name: &str, #[case] args: &[&str]) {
    let stderr = usage_error(name, args);
    assert!(!stderr.is_empty());
}

#[test]
fn help_exits_with_zero() {
    let output = exec("ecadd", &["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout).unwrap().contains("ecadd"));
}

#[test]
fn ecdiff_subcommands_match_binaries() {
    let input = format!("{G1}{G1}");
    assert_eq!(json("ecdiff", &["add", &input]), json("ecadd", &[&input]));
    assert_eq!(json("ecdiff", &["pairing"]), pairing_flag(true));
}

#[rstest]
#[case::ecadd("ecadd", &[])]
#[case::ecmul("ecmul", &["--scalar"])]
#[case::ecpairing("ecpairing", &["--pairs", "2"])]
fn generated_inputs_run(#[case] target: &str, #[case] options: &[&str]) {
    for seed in ["1", "2", "3"] {
        let args = [&["gen", target, "--seed", seed][..], options].concat();
        let generated = json("ecdiff", &args);
        assert_eq!(generated["success"], true);

        let input = generated["result"].as_str().unwrap();
        let result = json(target, &[input]);
        // Random coordinates may be rejected, but never as a usage error.
        assert!(result["success"] == true || result["error_code"] == "PRECOMPILE_ERROR");
    }
}

#[rstest]
#[case::zero("00")]
#[case::two("02")]
#[case::wide("ff")]
fn generated_ecmul_point_accepts_appended_scalar(#[case] last_byte: &str) {
    let generated = json("ecdiff", &["gen", "ecmul", "--seed", "1"]);
    let point = generated["result"].as_str().unwrap();
    assert_eq!(point.len(), 2 + 128);

    let input = format!("{point}{}{last_byte}", "0".repeat(62));
    let result = json("ecmul", &[&input]);
    assert!(result["success"] == true || result["error_code"] == "PRECOMPILE_ERROR");
}

#[test]
fn generator_rejects_invalid_probability() {
    let stderr = usage_error("ecdiff", &["gen", "ecadd", "--infinity-prob", "1.5"]);
    assert!(stderr.contains("infinity-prob"), "{stderr}");
}

#[test]
fn generator_caps_pairs() {
    usage_error("ecdiff", &["gen", "ecpairing", "--pairs", "171"]);
    let generated = json("ecdiff", &["gen", "ecpairing", "--pairs", "170", "--seed", "4"]);
    let input = generated["result"].as_str().unwrap();
    assert_eq!(input.len(), 2 + 170 * 2 * 384);
    assert!(json("ecpairing", &[input])["success"].is_boolean());
}

#[test]
fn logging_goes_to_stderr() {
    let output = Command::new(bin("ecadd"))
        .arg(format!("{G1}{G1}"))
        .env("RUST_LOG", "debug")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout, success(TWO_G1));
    assert!(!output.stderr.is_empty());
}
