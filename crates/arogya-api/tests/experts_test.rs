//! Expert verification document integration tests.
//!
//! Run with: `cargo test -p arogya-api --test experts_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{pdf_part, png_part};
use helpers::stubs::FailingStore;
use helpers::{api_path, count_files, setup_test_app, setup_test_app_with, TEST_DOCUMENT_MAX_BYTES};
use serde_json::Value;
use std::sync::Arc;

fn required_documents() -> MultipartForm {
    MultipartForm::new()
        .add_part("identityProof", pdf_part("aadhaar.pdf", "Identity card 7781"))
        .add_part("degreeCertificate", png_part("bams.png"))
        .add_part("registrationProof", pdf_part("council.pdf", "Registration 4421"))
}

#[tokio::test]
async fn test_submit_required_documents() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(required_documents())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    let verification = &body["verification"];
    assert_eq!(verification["status"], "pending");

    let documents = verification["documents"].as_array().expect("documents array");
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0]["field"], "identityProof");
    assert_eq!(documents[1]["field"], "degreeCertificate");
    assert_eq!(documents[2]["field"], "registrationProof");

    let identity_text = documents[0]["extracted_text"]["text"].as_str().unwrap();
    assert!(identity_text.contains("Identity"));
    assert!(documents[1].get("extracted_text").is_none());
    assert_eq!(documents[1]["asset"]["resource_kind"], "image");
    assert_eq!(documents[2]["asset"]["resource_kind"], "raw");

    // Disk-staged copies remain for manual review
    assert_eq!(count_files(&app.expert_staging_dir()), 3);
}

#[tokio::test]
async fn test_optional_practice_proof_accepted() {
    let app = setup_test_app().await;

    let form = required_documents().add_part("practiceProof", png_part("clinic.png"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    let documents = body["verification"]["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 4);
    assert_eq!(documents[3]["field"], "practiceProof");
}

#[tokio::test]
async fn test_missing_degree_certificate_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("identityProof", pdf_part("aadhaar.pdf", "Identity card 7781"))
        .add_part("registrationProof", pdf_part("council.pdf", "Registration 4421"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing required documents: degreeCertificate");
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(count_files(&app.expert_staging_dir()), 0);
}

#[tokio::test]
async fn test_duplicate_field_rejected() {
    let app = setup_test_app().await;

    let form = required_documents().add_part("identityProof", pdf_part("again.pdf", "Again"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Too many files. Maximum 1 identityProof document allowed"
    );
    assert_eq!(count_files(&app.expert_staging_dir()), 0);
}

#[tokio::test]
async fn test_unsupported_document_type_leaves_nothing_staged() {
    let app = setup_test_app().await;

    let archive = Part::bytes(b"PK\x03\x04 zipped".to_vec())
        .file_name("certificates.zip")
        .mime_type("application/zip");
    let form = MultipartForm::new()
        .add_part("identityProof", pdf_part("aadhaar.pdf", "Identity card 7781"))
        .add_part("degreeCertificate", archive)
        .add_part("registrationProof", pdf_part("council.pdf", "Registration 4421"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unsupported file type: application/zip");
    assert_eq!(body["code"], "UNSUPPORTED_TYPE");
    assert_eq!(count_files(&app.expert_staging_dir()), 0);
}

#[tokio::test]
async fn test_document_size_limit_is_inclusive() {
    let app = setup_test_app().await;

    let mut at_limit = b"\x89PNG\r\n\x1a\n".to_vec();
    at_limit.resize(TEST_DOCUMENT_MAX_BYTES, 0);
    let form = MultipartForm::new()
        .add_part("identityProof", pdf_part("aadhaar.pdf", "Identity card 7781"))
        .add_part(
            "degreeCertificate",
            Part::bytes(at_limit).file_name("scan.png").mime_type("image/png"),
        )
        .add_part("registrationProof", pdf_part("council.pdf", "Registration 4421"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let mut over_limit = b"\x89PNG\r\n\x1a\n".to_vec();
    over_limit.resize(TEST_DOCUMENT_MAX_BYTES + 1, 0);
    let form = MultipartForm::new().add_part(
        "identityProof",
        Part::bytes(over_limit).file_name("scan.png").mime_type("image/png"),
    );

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["error"], "File too large. Maximum size is 1 MB");
}

#[tokio::test]
async fn test_malformed_pdf_is_parse_error() {
    let app = setup_test_app().await;

    let broken = Part::bytes(b"%PDF-1.4\n1 0 obj\n<< /Type".to_vec())
        .file_name("broken.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new()
        .add_part("identityProof", broken)
        .add_part("degreeCertificate", png_part("bams.png"))
        .add_part("registrationProof", pdf_part("council.pdf", "Registration 4421"));

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "DOCUMENT_PARSE_ERROR");
    // Staged copies of a failed request are discarded
    assert_eq!(count_files(&app.expert_staging_dir()), 0);
}

#[tokio::test]
async fn test_remote_failure_discards_staged_documents() {
    let app = setup_test_app_with(Some(Arc::new(FailingStore)), None).await;

    let response = app
        .client()
        .post(&api_path("/experts/documents"))
        .multipart(required_documents())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "media upload failed");
    assert_eq!(count_files(&app.expert_staging_dir()), 0);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["remote_store"], "local");
    assert_eq!(body["content_validation"], false);

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let spec: Value = response.json();
    assert!(spec["paths"]["/api/v0/posts/media"].is_object());
}
