use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn tmp_path(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("phonetone-cli");
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir.join(name)
}

fn run_phonetone(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phonetone"))
        .args(args)
        .output()
        .expect("Failed to execute phonetone")
}

#[test]
fn test_generate_then_decode_raw() {
    let raw = tmp_path("dial.raw");
    let text = tmp_path("dial.txt");

    let gen = run_phonetone(&[
        "generate",
        "1470*#",
        raw.to_str().unwrap(),
        "--tone-ms",
        "90",
        "--gap-ms",
        "60",
    ]);
    assert!(gen.status.success(), "{}", String::from_utf8_lossy(&gen.stderr));
    assert_eq!(fs::metadata(&raw).unwrap().len(), 6 * 150 * 8);

    let dec = run_phonetone(&["decode", raw.to_str().unwrap(), text.to_str().unwrap()]);
    assert!(dec.status.success(), "{}", String::from_utf8_lossy(&dec.stderr));
    assert_eq!(fs::read_to_string(&text).unwrap(), "1470*#\n");
}

#[test]
fn test_unsigned_raw_to_stdout() {
    let raw = tmp_path("unsigned.raw");

    let gen = run_phonetone(&[
        "generate",
        "--unsigned",
        "--tone-ms",
        "90",
        "--gap-ms",
        "60",
        "258",
        raw.to_str().unwrap(),
    ]);
    assert!(gen.status.success());

    let dec = run_phonetone(&["decode", "--unsigned", raw.to_str().unwrap()]);
    assert!(dec.status.success());
    assert_eq!(String::from_utf8_lossy(&dec.stdout), "258\n");
}

#[test]
fn test_mf_wav_round_trip() {
    let wav = tmp_path("mf.wav");

    let gen = run_phonetone(&[
        "generate",
        "--mf",
        "--wav",
        "--tone-ms",
        "90",
        "--gap-ms",
        "60",
        "KP1 7 ST",
        wav.to_str().unwrap(),
    ]);
    assert!(gen.status.success(), "{}", String::from_utf8_lossy(&gen.stderr));

    let bytes = fs::read(&wav).unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");

    let dec = run_phonetone(&["decode", wav.to_str().unwrap()]);
    assert!(dec.status.success(), "{}", String::from_utf8_lossy(&dec.stderr));
    assert_eq!(String::from_utf8_lossy(&dec.stdout), " KP1+7+ST \n");
}

#[test]
fn test_invalid_flush_threshold_rejected() {
    let raw = tmp_path("empty.raw");
    fs::write(&raw, b"").unwrap();

    let dec = run_phonetone(&["decode", "--flush-frames", "0", raw.to_str().unwrap()]);
    assert!(!dec.status.success());
    assert!(dec.stdout.is_empty());
}

#[test]
fn test_generate_rejects_unknown_keys() {
    let raw = tmp_path("bad.raw");
    let gen = run_phonetone(&["generate", "12x", raw.to_str().unwrap()]);
    assert!(!gen.status.success());
}
