//! Command-line tests for the bioconvert binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bioconvert() -> Command {
    Command::cargo_bin("bioconvert").expect("binary should build")
}

#[test]
fn test_convert_fasta_to_fastq() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fa");
    let output = dir.path().join("reads.fastq");
    std::fs::write(&input, ">seqA\nACGT\n>seqB\nGGCC\n").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("fasta2fastq via native"));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "@seqA\nACGT\n+\nIIII\n@seqB\nGGCC\n+\nIIII\n"
    );
}

#[test]
fn test_convert_with_quality_file_and_checksum() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fasta");
    let quality = dir.path().join("reads.qual");
    let output = dir.path().join("reads.fq");
    std::fs::write(&input, ">r1\nACGT\n").unwrap();
    std::fs::write(&quality, ">r1\n!#%'\n").unwrap();

    let assert = bioconvert()
        .args(["--format", "json", "convert"])
        .arg(&input)
        .arg(&output)
        .arg("--quality-file")
        .arg(&quality)
        .arg("--checksum")
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["converter"], "fasta2fastq");
    assert_eq!(json["method"], "native");
    // md5 of "@r1\nACGT\n+\n!#%'\n"
    let expected = format!("{:x}", md5::compute(b"@r1\nACGT\n+\n!#%'\n"));
    assert_eq!(json["md5"], expected.as_str());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "@r1\nACGT\n+\n!#%'\n");
}

#[test]
fn test_convert_atomic_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fq");
    let output = dir.path().join("reads.fa");
    std::fs::write(&input, "@r1 sample\nACGTAC\n+\nIIIIII\n").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .args(["--atomic", "--line-width", "4"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), ">r1 sample\nACGT\nAC\n");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_convert_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fa");
    let output = dir.path().join("reads.fq");
    std::fs::write(&input, ">r\nA\n").unwrap();
    std::fs::write(&output, "keep me").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .arg("--force")
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "@r\nA\n+\nI\n");
}

#[test]
fn test_convert_unknown_pair_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fq");
    std::fs::write(&input, "@r\nA\n+\nI\n").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(dir.path().join("reads.embl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No converter"));
}

#[test]
fn test_convert_unknown_method_lists_alternatives() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fa");
    std::fs::write(&input, ">r\nA\n").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(dir.path().join("reads.fq"))
        .args(["--method", "biopython"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("biopython").and(predicate::str::contains("seqtk")));
}

#[test]
fn test_convert_rejects_option_for_other_converter() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reads.fa");
    std::fs::write(&input, ">r\nA\n").unwrap();

    bioconvert()
        .arg("convert")
        .arg(&input)
        .arg(dir.path().join("reads.fq"))
        .args(["--line-width", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line_width"));
}

#[test]
fn test_list_shows_builtin_converters() {
    bioconvert()
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("fasta2fastq")
                .and(predicate::str::contains("fastq2fasta"))
                .and(predicate::str::contains("fasta2phylip"))
                .and(predicate::str::contains("embl2genbank"))
                .and(predicate::str::contains("--quality-file")),
        );
}

#[test]
fn test_list_json_marks_defaults() {
    let assert = bioconvert().args(["list", "--format", "json"]).assert().success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let converters = json.as_array().unwrap();
    assert_eq!(converters.len(), 4);

    for converter in converters {
        let defaults = converter["methods"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|m| m["default"] == true)
            .count();
        assert_eq!(defaults, 1, "{}", converter["id"]);
    }
}

#[test]
fn test_batch_reports_each_job() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.fa"), ">a\nAC\n").unwrap();
    std::fs::write(dir.path().join("b.fq"), "@b\nGT\n+\nII\n").unwrap();
    let jobs = dir.path().join("jobs.tsv");
    std::fs::write(&jobs, "# input\toutput\na.fa\ta.fq\nb.fq\tb.fasta\n").unwrap();

    bioconvert()
        .arg("batch")
        .arg(&jobs)
        .args(["--jobs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 conversions succeeded"));

    assert_eq!(std::fs::read_to_string(dir.path().join("a.fq")).unwrap(), "@a\nAC\n+\nII\n");
    assert_eq!(std::fs::read_to_string(dir.path().join("b.fasta")).unwrap(), ">b\nGT\n");
}

#[test]
fn test_batch_fails_if_any_job_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.fa"), ">a\nAC\n").unwrap();
    let jobs = dir.path().join("jobs.tsv");
    std::fs::write(&jobs, "a.fa\ta.fq\nmissing.fa\tm.fq\n").unwrap();

    bioconvert()
        .arg("batch")
        .arg(&jobs)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("1 of 2 conversions failed"));

    assert!(dir.path().join("a.fq").exists());
}
