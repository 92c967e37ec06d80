//! Whole-document runs through the public entry points.

mod common;

use common::{write_fixture_pdf, ScriptedModel, StalledModel};
use edgequake_pdfproof::{
    proofread_document, PageText, ProofreadConfig, ProofreadError, ProofreadSession, Stage,
};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn missing_credential_fails_before_the_pdf_is_read() {
    // Only this test binary touches MISTRAL_API_KEY.
    std::env::remove_var("MISTRAL_API_KEY");
    let config = ProofreadConfig::builder()
        .provider_name("mistral")
        .build()
        .unwrap();

    let mut out = Vec::new();
    let err = assert_err!(proofread_document("/definitely/not/here.pdf", &config, &mut out).await);

    assert!(
        matches!(
            err,
            ProofreadError::MissingApiKey { ref provider, ref var }
                if provider == "mistral" && var == "MISTRAL_API_KEY"
        ),
        "expected MissingApiKey, got {err:?}"
    );
    assert!(out.is_empty());
}

#[tokio::test]
async fn timeout_too_large_for_the_clock_still_runs() {
    let model = ScriptedModel::ok(&["tidied", "feedback"]);
    let config = ProofreadConfig::builder()
        .timeout_secs(u64::MAX)
        .build()
        .unwrap();
    let pages = vec![PageText::new(1, "raw")];

    let mut out = Vec::new();
    let stats = assert_ok!(
        ProofreadSession::new(&model, &config)
            .run(&pages, 1, &mut out)
            .await
    );

    assert_eq!(stats.llm_calls, 2);
}

#[tokio::test(start_paused = true)]
async fn handed_over_deadline_is_not_restarted() {
    let config = ProofreadConfig::builder().timeout_secs(60).build().unwrap();
    let pages = vec![PageText::new(1, "raw")];

    // A deadline that was armed earlier and has already passed.
    let deadline = tokio::time::Instant::now();
    tokio::time::advance(std::time::Duration::from_secs(1)).await;

    let mut out = Vec::new();
    let err = assert_err!(
        ProofreadSession::new(&StalledModel, &config)
            .run_until(&pages, 1, deadline, &mut out)
            .await
    );

    assert!(matches!(
        err,
        ProofreadError::DeadlineExceeded { page: 1, stage: Stage::Reformat, .. }
    ));
}

#[tokio::test]
async fn single_page_document_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture_pdf(dir.path(), "one.pdf", "One", &["Only page"]);
    let model = ScriptedModel::ok(&["Only page", "Looks fine."]);
    let config = ProofreadConfig::default();

    let mut out = Vec::new();
    let stats = assert_ok!(
        edgequake_pdfproof::proofread_with_model(path.to_str().unwrap(), &model, &config, &mut out)
            .await
    );

    assert_eq!(stats.total_pages, 1);
    assert!(String::from_utf8(out).unwrap().ends_with("=== Proofread page ===\nLooks fine.\n"));
}
