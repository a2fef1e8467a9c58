mod common;

use common::{create_test_console, ScriptedBackend};
use elina_core::{
    bulk_import::{BulkImport, ImportFile, TEMPLATE_CSV},
    staged::{CommitOutcome, StagePhase},
    transport::RequestBody,
};
use serde_json::{json, Value};

fn dry_run(invalid: u32) -> Value {
    let errors = if invalid == 0 {
        json!([])
    } else {
        json!(["Unknown code type"])
    };
    json!({
        "dryRun": true,
        "totalRows": 2,
        "validRows": 2 - invalid,
        "invalidRows": invalid,
        "rows": [
            { "rowNumber": 2, "codeType": "WORK_CENTER", "codeValue": "WC_SITE", "valid": true, "action": "CREATE" },
            { "rowNumber": 3, "codeType": "COST_CENTER", "codeValue": "CC_001", "valid": invalid == 0, "errors": errors, "action": "UPDATE" }
        ]
    })
}

fn dry_run_field(body: &RequestBody) -> Option<String> {
    match body {
        RequestBody::Multipart(part) => part
            .fields
            .iter()
            .find(|(name, _)| name == "dryRun")
            .map(|(_, value)| value.clone()),
        _ => None,
    }
}

#[tokio::test]
async fn test_invalid_rows_block_the_import() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    let file = ImportFile::from_bytes("codes.csv", TEMPLATE_CSV.as_bytes().to_vec()).expect("file");

    let mut import = BulkImport::master_codes();
    backend.ok(dry_run(1));
    let preview = import.stage(&console, file).await.expect("dry run");
    assert_eq!(preview.invalid_rows, 1);
    assert!(!import.is_committable());

    assert!(import.arm().is_err());
    assert!(import.commit(&console).await.is_err());
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(
        dry_run_field(&backend.requests()[0].body).as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_clean_dry_run_then_commit() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    let file = ImportFile::from_bytes("codes.csv", TEMPLATE_CSV.as_bytes().to_vec()).expect("file");

    let mut import = BulkImport::master_codes();
    backend.ok(dry_run(0));
    import.stage(&console, file).await.expect("dry run");
    assert!(import.is_committable());
    import.arm().expect("arm");

    backend.ok(json!({
        "dryRun": false,
        "totalRows": 2,
        "validRows": 2,
        "invalidRows": 0,
        "createdCount": 1,
        "updatedCount": 1
    }));
    let outcome = import.commit(&console).await.expect("commit");
    let CommitOutcome::Committed(result) = outcome else {
        panic!("expected committed import");
    };
    assert_eq!(result.created_count, 1);
    assert_eq!(result.updated_count, 1);
    assert_eq!(import.phase(), StagePhase::Committed);

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(dry_run_field(&requests[1].body).as_deref(), Some("false"));
    let RequestBody::Multipart(part) = &requests[1].body else {
        panic!("expected multipart upload");
    };
    assert_eq!(part.field, "file");
    assert_eq!(part.file_name, "codes.csv");
}

#[tokio::test]
async fn test_bad_header_never_uploads() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, _console) = create_test_console(backend.clone(), &[]).await;

    assert!(ImportFile::from_bytes("codes.csv", b"type,value\nA,B\n".to_vec()).is_err());
    assert!(backend.requests().is_empty());
}
