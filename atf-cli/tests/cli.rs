use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn atf_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn parse_prints_one_occurrence_per_line() {
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("parse").arg("{d}utu-ḫe₂").arg("--language").arg("s");

    cmd.assert().success().stdout(
        predicate::str::contains("d\tsux\tDETERMINATIVE\tnone")
            .and(predicate::str::contains("utu\tsux\t-\tnone"))
            .and(predicate::str::contains("ḫe₂\tsux\t-\thyphen")),
    );
}

#[test]
fn parse_json_output() {
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("parse").arg("[ka]").arg("--format").arg("json");

    cmd.assert().success().stdout(
        predicate::str::contains("\"text\": \"ka\"")
            .and(predicate::str::contains("\"BROKEN\""))
            .and(predicate::str::contains("\"delimiter\": null")),
    );
}

#[test]
fn parse_failure_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("parse").arg("ka] lugal");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unstarted BROKEN: ka☞] lugal"));
}

#[test]
fn corpus_profile_changes_the_dialect() {
    let mut plain = cargo_bin_cmd!("atf");
    plain.arg("parse").arg("a--na");
    plain
        .assert()
        .failure()
        .stderr(predicate::str::contains("Double delimiter"));

    let mut saao = cargo_bin_cmd!("atf");
    saao.arg("parse").arg("a--na").arg("--corpus").arg("saao");
    saao.assert()
        .success()
        .stdout(predicate::str::contains("na\takk-x-neoass\t-\tem-dash"));
}

#[test]
fn unknown_corpus_lists_the_known_ones() {
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("parse").arg("ka").arg("--corpus").arg("nowhere");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown corpus").and(predicate::str::contains("oracc")));
}

#[test]
fn scan_reports_and_continues() {
    let file = atf_file("&P1 = Test\n#atf: lang sux\n1. lugal-e\n2. lugal]\n3. e₂ lugal\n");
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("scan").arg(file.path()).arg("--top").arg("1");

    cmd.assert().success().stdout(
        predicate::str::contains("Lines parsed: 2, skipped: 1")
            .and(predicate::str::contains("unstarted-attribute: 1"))
            .and(predicate::str::contains("P1 2.: Unstarted BROKEN"))
            .and(predicate::str::contains("lugal\t2")),
    );
}

#[test]
fn scan_json_output() {
    let file = atf_file("&P2\n1. a-na\n2. ...\n");
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("scan").arg(file.path()).arg("--format").arg("json");

    cmd.assert().success().stdout(
        predicate::str::contains("\"lines_parsed\": 1")
            .and(predicate::str::contains("\"breakage-outside-brackets\": 1")),
    );
}

#[test]
fn config_file_adds_a_corpus() {
    let config = atf_file(
        "[corpora.mine]\ndescription = \"Dotted\"\nextensions = { dot_as_delimiter = true }\n",
    );
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("--config")
        .arg(config.path())
        .arg("parse")
        .arg("a.b")
        .arg("--corpus")
        .arg("mine");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("b\tund\t-\tdot"));

    let mut list = cargo_bin_cmd!("atf");
    list.arg("--config").arg(config.path()).arg("corpora");
    list.assert()
        .success()
        .stdout(predicate::str::contains("mine").and(predicate::str::contains("Dotted")));
}

#[test]
fn corpora_lists_builtin_profiles() {
    let mut cmd = cargo_bin_cmd!("atf");
    cmd.arg("corpora");

    cmd.assert().success().stdout(
        predicate::str::contains("oracc (default)")
            .and(predicate::str::contains("saao"))
            .and(predicate::str::contains("dishless-numbers")),
    );
}
