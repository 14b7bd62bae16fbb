/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod common;
use common::*;

use std::sync::Arc;

use citeblock_core::{
    FileStyleRepository, SaveStatus, StoreError, StyleRecord, StyleRepository, StyleUpload,
    StyleUploadForm, UploadedFile,
};

#[test]
fn uploading_apa_creates_one_record_then_updates_it() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(FileStyleRepository::new(dir.path()));
    let form = StyleUploadForm::new(repo.clone());

    let created = form.submit(csl_upload("APA", "apa.csl")).unwrap();
    assert_eq!(created.record_id, "apa");
    assert_eq!(created.status, SaveStatus::New);
    assert_eq!(created.message, "Created new citation style APA.");
    assert_eq!(created.redirect, "/admin/styles");
    assert_eq!(repo.load_multiple().unwrap().len(), 1);

    let updated = form
        .submit(csl_upload("APA", "apa-7th.xml").with_id("apa"))
        .unwrap();
    assert_eq!(updated.status, SaveStatus::Updated);
    assert_eq!(updated.message, "Updated citation style APA.");
    assert_eq!(repo.load_multiple().unwrap().len(), 1);
}

#[test]
fn file_repository_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    {
        let repo = FileStyleRepository::new(dir.path());
        repo.save(StyleRecord::new("mla", "MLA", style_xml("MLA"))).unwrap();
        repo.save(StyleRecord::new("apa", "APA", style_xml("APA"))).unwrap();
    }

    let repo = FileStyleRepository::new(dir.path());
    let labels: Vec<_> = repo
        .load_multiple()
        .unwrap()
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, ["MLA", "APA"]);

    let apa = repo.load("apa").unwrap().unwrap();
    assert_eq!(apa.file_content, style_xml("APA"));
    assert!(dir.path().join("apa.csl").exists());
}

#[test]
fn file_repository_delete_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStyleRepository::new(dir.path());
    repo.save(StyleRecord::new("apa", "APA", style_xml("APA"))).unwrap();

    let removed = repo.delete("apa").unwrap();
    assert_eq!(removed.label, "APA");
    assert!(!dir.path().join("apa.csl").exists());
    assert!(repo.load("apa").unwrap().is_none());
    assert!(matches!(repo.delete("apa"), Err(StoreError::StyleNotFound(_))));
}

#[test]
fn empty_directory_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStyleRepository::new(dir.path().join("not-yet-created"));
    assert!(repo.load_multiple().unwrap().is_empty());
    assert!(!repo.exists("apa").unwrap());
}

#[test]
fn relabelling_keeps_listing_position() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(FileStyleRepository::new(dir.path()));
    let form = StyleUploadForm::new(repo.clone());
    form.submit(csl_upload("MLA", "mla.csl")).unwrap();
    form.submit(csl_upload("Chicago", "chicago.csl")).unwrap();

    form.submit(StyleUpload {
        id: Some("mla".into()),
        label: "MLA 9th".into(),
        file: None,
    })
    .unwrap();

    let records = repo.load_multiple().unwrap();
    assert_eq!(records[0].id, "mla");
    assert_eq!(records[0].label, "MLA 9th");
    assert_eq!(records[0].file_content, style_xml("MLA"));
    assert_eq!(records[1].id, "chicago");
}

#[test]
fn upload_rejects_bad_extension_without_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(FileStyleRepository::new(dir.path()));
    let form = StyleUploadForm::new(repo.clone());

    let result = form.submit(StyleUpload::new(
        "APA",
        UploadedFile::new("apa.json", style_xml("APA")),
    ));
    assert!(result.is_err());
    assert!(repo.load_multiple().unwrap().is_empty());
}

#[test]
fn missing_style_file_is_skipped_and_deletable() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileStyleRepository::new(dir.path());
    repo.save(StyleRecord::new("mla", "MLA", style_xml("MLA"))).unwrap();
    repo.save(StyleRecord::new("apa", "APA", style_xml("APA"))).unwrap();
    std::fs::remove_file(dir.path().join("mla.csl")).unwrap();

    let ids: Vec<_> = repo
        .load_multiple()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["apa"]);
    assert!(repo.load("mla").unwrap().is_none());

    let deleted = repo.delete("mla").unwrap();
    assert_eq!(deleted.label, "MLA");
    assert!(deleted.file_content.is_empty());
    assert!(!repo.exists("mla").unwrap());
    assert_eq!(repo.load_multiple().unwrap().len(), 1);
}
