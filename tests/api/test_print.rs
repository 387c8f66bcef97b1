//! POST /api/print tests.

use actix_web::http::StatusCode;
use actix_web::test;
use printrelay_lib::error::ErrorResponse;
use printrelay_lib::middleware::REQUEST_ID_HEADER;
use serde_json::Value;

use super::test_helpers::*;

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

#[actix_rt::test]
async fn test_print_submits_job_and_reports_request_id() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-117\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .text("copies", "3")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Print job submitted successfully");
    assert_eq!(body["jobId"], "HP_LaserJet-117");
    assert_eq!(body["printer"], "HP_LaserJet");
    assert_eq!(body["copies"], 3);
    assert_eq!(body["fileName"], "invoice.pdf");

    let jobs = ctx.spooler.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].command.printer, "HP_LaserJet");
    assert_eq!(jobs[0].command.copies, 3);
    assert_eq!(jobs[0].contents.as_deref(), Some(PDF));
    assert!(jobs[0].command.file.starts_with(ctx.upload_dir.path()));
    assert_ne!(
        jobs[0].command.file.file_name().and_then(|n| n.to_str()),
        Some("invoice.pdf")
    );

    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_defaults_to_one_copy() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-118\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "notes.txt", b"hello")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["copies"], 1);
    assert_eq!(body["jobId"], "HP_LaserJet-118");
    assert_eq!(ctx.spooler.jobs()[0].command.copies, 1);
}

#[actix_rt::test]
async fn test_print_non_numeric_copies_fall_back_to_one() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-119\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "notes.txt", b"hello")
        .text("copies", "several")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["copies"], 1);
}

#[actix_rt::test]
async fn test_print_rejects_too_many_copies() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-120\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .text("copies", "1000")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Copies must be between 1 and 999");

    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_rejects_zero_copies() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .text("copies", "0")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_without_file_is_rejected() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new().text("copies", "2").into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "No file uploaded");
    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_file_part_without_filename_counts_as_no_file() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-1\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    // What a browser submits when no file was chosen
    let req = MultipartBody::new()
        .file("file", "", b"")
        .text("copies", "1")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "No file uploaded");
    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_file_under_other_field_name_is_not_a_document() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("attachment", "invoice.pdf", PDF)
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_without_configured_printer() {
    let ctx = TestContext::new(ScriptedSpooler::new(SubmitReply::Stdout(""))).await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(
        body.error,
        "No printer configured. Please configure a printer first using /api/config"
    );
    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_command_failure_is_reported() {
    let ctx = TestContext::with_printer(
        "Ghost_Printer",
        ScriptedSpooler::new(SubmitReply::Fail(
            "lp: The printer or class does not exist.",
        )),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Failed to print document");
    assert_eq!(
        body.message.as_deref(),
        Some("lp: The printer or class does not exist.")
    );

    assert_eq!(ctx.spooler.jobs().len(), 1);
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_without_request_id_reports_unknown() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "invoice.pdf", PDF)
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["jobId"], "unknown");
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_oversized_upload_is_rejected() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("")),
    )
    .await
    .with_max_upload_size(16);
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new()
        .file("file", "big.pdf", &[b'x'; 64])
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "File too large");
    assert!(ctx.spooler.jobs().is_empty());
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_print_uses_latest_configured_printer() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is Office-3\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/config")
        .set_json(serde_json::json!({ "printerName": "Office" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = MultipartBody::new()
        .file("file", "memo.txt", b"memo")
        .into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["printer"], "Office");
    assert_eq!(ctx.spooler.jobs()[0].command.printer, "Office");
}

#[actix_rt::test]
async fn test_concurrent_prints_use_distinct_files() {
    let ctx = TestContext::with_printer(
        "HP_LaserJet",
        ScriptedSpooler::new(SubmitReply::Stdout("request id is HP_LaserJet-1\n")),
    )
    .await;
    let app = create_test_app(&ctx).await;

    let first = test::call_service(
        &app,
        MultipartBody::new()
            .file("file", "same.pdf", b"first")
            .into_request(),
    );
    let second = test::call_service(
        &app,
        MultipartBody::new()
            .file("file", "same.pdf", b"second")
            .into_request(),
    );
    let (first, second) = futures_util::future::join(first, second).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let jobs = ctx.spooler.jobs();
    assert_eq!(jobs.len(), 2);
    assert_ne!(jobs[0].command.file, jobs[1].command.file);
    let mut contents: Vec<_> = jobs.iter().filter_map(|j| j.contents.clone()).collect();
    contents.sort();
    assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
    assert_eq!(ctx.leftover_uploads(), 0);
}

#[actix_rt::test]
async fn test_response_carries_request_id_header() {
    let ctx = TestContext::new(ScriptedSpooler::new(SubmitReply::Stdout(""))).await;
    let app = create_test_app(&ctx).await;

    let req = MultipartBody::new().into_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}
