mod common;

use assert_cmd::prelude::{CommandCargoExt, OutputAssertExt};
use assert_fs::prelude::*;
use common::{lzw_compress, tar_z_archive};
use fake::faker::lorem::en::Words;
use fake::Fake;
use predicates::prelude::predicate;
use std::process::Command;

#[test]
fn reports_when_no_compressed_files_are_found() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let mut sut = Command::cargo_bin("zextract")?;

    sut.arg("extract").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("No .Z files found"));

    Ok(())
}

#[test]
fn extracts_a_plain_z_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    dir.child("note.txt.Z")
        .write_binary(&lzw_compress(content.as_bytes()))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("Processing file:"))
        .stdout(predicate::str::contains("All extractions complete."));

    dir.child("extracted/note.txt").assert(content.as_str());

    Ok(())
}

#[test]
fn extracts_a_tar_z_archive_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("bundle.tar.Z")
        .write_binary(&tar_z_archive(&[("greeting.txt", b"hi\n")]))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("Extracted: greeting.txt"))
        .stdout(predicate::str::contains("All extractions complete."));

    dir.child("extracted/greeting.txt").assert("hi\n");

    Ok(())
}

#[test]
fn extracts_into_an_explicit_target_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let out = assert_fs::TempDir::new()?;
    dir.child("note.txt.Z").write_binary(&lzw_compress(b"hello"))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract")
        .arg(dir.path())
        .arg("--target")
        .arg(out.path());

    sut.assert().success();
    out.child("note.txt").assert("hello");

    Ok(())
}

#[test]
fn preview_echoes_the_extracted_content() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("note.txt.Z")
        .write_binary(&lzw_compress(b"shown on the console"))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path()).arg("--preview");

    sut.assert()
        .success()
        .stdout(predicate::str::contains("shown on the console"));

    Ok(())
}

#[test]
fn cat_streams_the_decoded_bytes_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let file = dir.child("data.Z");
    file.write_binary(&lzw_compress(b"raw decoded output"))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("cat").arg(file.path());

    sut.assert()
        .success()
        .stdout(predicate::eq("raw decoded output"));

    Ok(())
}

#[test]
fn list_shows_archive_entries_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("bundle.tar.Z")
        .write_binary(&tar_z_archive(&[("greeting.txt", b"hi\n")]))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("list").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("greeting.txt"));

    dir.child("extracted/greeting.txt")
        .assert(predicates::path::missing());

    Ok(())
}

#[test]
fn hostile_archives_cannot_escape_the_target() -> Result<(), Box<dyn std::error::Error>> {
    let outer = assert_fs::TempDir::new()?;
    let dir = outer.child("data");
    dir.create_dir_all()?;
    dir.child("bundle.tar.Z")
        .write_binary(&tar_z_archive(&[("../../escape.txt", b"oops")]))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("escapes the target directory"));

    outer.child("escape.txt").assert(predicates::path::missing());

    Ok(())
}

#[test]
fn strict_mode_fails_the_batch_on_a_corrupt_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("broken.txt.Z").write_binary(b"not a Z stream")?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path()).arg("--strict");

    sut.assert().failure();

    Ok(())
}

#[test]
fn a_corrupt_file_does_not_block_the_rest_of_the_batch(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("a_broken.txt.Z").write_binary(b"not a Z stream")?;
    dir.child("b_fine.txt.Z").write_binary(&lzw_compress(b"ok"))?;

    let mut sut = Command::cargo_bin("zextract")?;
    sut.arg("extract").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::contains("1 failed file(s)"));

    dir.child("extracted/b_fine.txt").assert("ok");

    Ok(())
}
