//! WBS confirmation endpoints and their permission gates.

use jiff::civil::Date;
use log::info;

use super::Console;
use crate::{
    error::{ConsoleError, Result, ACCESS_DENIED_MESSAGE},
    models::{Confirmation, ConfirmationRequest, ConfirmationSummary},
    params::Id,
    transport::ApiRequest,
};

/// Permission required to confirm a WBS.
pub const PERMISSION_CONFIRM: &str = "PAGE_CONFIRMATION_EDIT";

/// Permission required to undo a confirmation.
pub const PERMISSION_UNDO_CONFIRMATION: &str = "PAGE_CONFIRMATION_ADMIN";

impl Console {
    /// Totals for a WBS. With `preview_date` the backend also reports what
    /// a confirmation on that date would freeze. Never creates anything.
    pub async fn confirmation_summary(
        &self,
        wbs: &Id,
        preview_date: Option<Date>,
    ) -> Result<ConfirmationSummary> {
        let mut request = ApiRequest::get(format!("/api/confirmations/wbs/{}/summary", wbs.id));
        if let Some(date) = preview_date {
            request = request.query("previewDate", date);
        }
        self.client.fetch(request).await
    }

    pub async fn confirmation_history(&self, wbs: &Id) -> Result<Vec<Confirmation>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/confirmations/wbs/{}", wbs.id)))
            .await
    }

    /// Freezes progress of a WBS up to `request.confirmation_date`.
    pub async fn confirm_wbs(
        &self,
        wbs: &Id,
        request: &ConfirmationRequest,
    ) -> Result<Confirmation> {
        self.require_permission(PERMISSION_CONFIRM).await?;

        let api_request =
            ApiRequest::post(format!("/api/confirmations/wbs/{}", wbs.id)).json(request)?;
        let confirmation: Confirmation = self.client.fetch(api_request).await?;
        info!(
            "Confirmed WBS {} up to {}",
            wbs.id, confirmation.confirmation_date
        );
        Ok(confirmation)
    }

    /// Removes a confirmation, reopening the dates it locked.
    pub async fn undo_confirmation(&self, confirmation: &Id) -> Result<()> {
        self.require_permission(PERMISSION_UNDO_CONFIRMATION).await?;

        self.client
            .execute(ApiRequest::delete(format!(
                "/api/confirmations/{}",
                confirmation.id
            )))
            .await?;
        info!("Undid confirmation {}", confirmation.id);
        Ok(())
    }

    /// True when the logged-in user holds `permission`.
    pub async fn has_permission(&self, permission: &str) -> Result<bool> {
        Ok(self
            .current_session()
            .await?
            .user
            .is_some_and(|user| user.has_permission(permission)))
    }

    pub(crate) async fn require_permission(&self, permission: &str) -> Result<()> {
        let user = self.require_user().await?;
        if user.has_permission(permission) {
            Ok(())
        } else {
            Err(ConsoleError::AuthorizationDenied {
                message: ACCESS_DENIED_MESSAGE.to_string(),
            })
        }
    }
}
