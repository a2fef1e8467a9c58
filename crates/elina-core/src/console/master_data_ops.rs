//! Master code administration and spreadsheet upload.

use log::info;

use super::Console;
use crate::{
    bulk_import::ImportFile,
    error::{ConsoleError, Result},
    models::{BulkUploadResult, MasterCode, MasterCodeDraft},
    params::Id,
    transport::{ApiRequest, FilePart},
};

fn validate_draft(draft: &MasterCodeDraft) -> Result<()> {
    if draft.code_type.trim().is_empty() {
        return Err(ConsoleError::validation("codeType").with_reason("must not be empty"));
    }
    if draft.code_value.trim().is_empty() {
        return Err(ConsoleError::validation("codeValue").with_reason("must not be empty"));
    }
    Ok(())
}

impl Console {
    pub async fn code_types(&self) -> Result<Vec<String>> {
        self.client
            .fetch(ApiRequest::get("/api/master-codes/code-types"))
            .await
    }

    pub async fn master_codes(&self, code_type: &str) -> Result<Vec<MasterCode>> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/api/master-codes/by-type/{code_type}"
            )))
            .await
    }

    pub async fn create_master_code(&self, draft: &MasterCodeDraft) -> Result<MasterCode> {
        validate_draft(draft)?;
        let code: MasterCode = self
            .client
            .fetch(ApiRequest::post("/api/master-codes").json(draft)?)
            .await?;
        info!("Created master code {}/{}", code.code_type, code.code_value);
        Ok(code)
    }

    pub async fn update_master_code(&self, code: &Id, draft: &MasterCodeDraft) -> Result<MasterCode> {
        validate_draft(draft)?;
        let updated: MasterCode = self
            .client
            .fetch(ApiRequest::put(format!("/api/master-codes/{}", code.id)).json(draft)?)
            .await?;
        info!("Updated master code {}", code.id);
        Ok(updated)
    }

    pub async fn delete_master_code(&self, code: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/master-codes/{}", code.id)))
            .await?;
        info!("Deleted master code {}", code.id);
        Ok(())
    }

    /// Sends a spreadsheet to the bulk endpoint. With `dry_run` the backend
    /// only reports what it would do.
    pub async fn upload_master_codes(
        &self,
        file: &ImportFile,
        dry_run: bool,
    ) -> Result<BulkUploadResult> {
        let request = ApiRequest::post("/api/master-codes/bulk-upload").multipart(FilePart {
            field: "file".to_string(),
            file_name: file.file_name().to_string(),
            bytes: file.bytes().to_vec(),
            fields: vec![("dryRun".to_string(), dry_run.to_string())],
        });
        let result: BulkUploadResult = self.client.fetch(request).await?;
        info!(
            "Bulk upload of {} ({}): {} valid, {} invalid",
            file.file_name(),
            if dry_run { "dry run" } else { "commit" },
            result.valid_rows,
            result.invalid_rows
        );
        Ok(result)
    }
}
