//! Business rule administration.

use log::{debug, info};

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{BusinessRule, BusinessRuleDraft, RuleCheck},
    params::{Id, ListRules},
    transport::ApiRequest,
};

fn validate_draft(draft: &BusinessRuleDraft) -> Result<()> {
    if draft.rule_number <= 0 {
        return Err(ConsoleError::validation("ruleNumber").with_reason("must be positive"));
    }
    if draft.control_point.trim().is_empty() {
        return Err(ConsoleError::validation("controlPoint").with_reason("must not be empty"));
    }
    Ok(())
}

impl Console {
    pub async fn list_rules(&self, params: &ListRules) -> Result<Vec<BusinessRule>> {
        let mut rules: Vec<BusinessRule> = self
            .client
            .fetch(ApiRequest::get("/api/business-rules"))
            .await?;
        if params.active_only {
            rules.retain(|rule| rule.active);
        }
        Ok(rules)
    }

    pub async fn rule_by_number(&self, rule_number: i32) -> Result<BusinessRule> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/api/business-rules/by-number/{rule_number}"
            )))
            .await
    }

    /// Names of the points in the workflow a rule can attach to.
    pub async fn control_points(&self) -> Result<Vec<String>> {
        self.client
            .fetch(ApiRequest::get("/api/business-rules/control-points"))
            .await
    }

    pub async fn create_rule(&self, draft: &BusinessRuleDraft) -> Result<BusinessRule> {
        validate_draft(draft)?;
        let rule: BusinessRule = self
            .client
            .fetch(ApiRequest::post("/api/business-rules").json(draft)?)
            .await?;
        info!("Created business rule #{}", rule.rule_number);
        Ok(rule)
    }

    pub async fn update_rule(&self, rule: &Id, draft: &BusinessRuleDraft) -> Result<BusinessRule> {
        validate_draft(draft)?;
        let updated: BusinessRule = self
            .client
            .fetch(ApiRequest::put(format!("/api/business-rules/{}", rule.id)).json(draft)?)
            .await?;
        info!("Updated business rule #{}", updated.rule_number);
        Ok(updated)
    }

    /// Flips a rule between active and inactive.
    pub async fn toggle_rule(&self, rule: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::put(format!(
                "/api/business-rules/{}/activate-toggle",
                rule.id
            )))
            .await?;
        info!("Toggled business rule {}", rule.id);
        Ok(())
    }

    /// Evaluates one rule against `check.context` without changing anything.
    ///
    /// A failing rule comes back as `ConsoleError::RuleViolation` and is
    /// published on the violation channel like any other.
    pub async fn validate_rule(&self, check: &RuleCheck) -> Result<()> {
        if check.rule_number <= 0 {
            return Err(ConsoleError::validation("ruleNumber").with_reason("must be positive"));
        }
        self.client
            .execute(ApiRequest::post("/api/business-rules/validate-single").json(check)?)
            .await?;
        debug!("Rule #{} passed", check.rule_number);
        Ok(())
    }

    pub async fn delete_rule(&self, rule: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/business-rules/{}", rule.id)))
            .await?;
        info!("Deleted business rule {}", rule.id);
        Ok(())
    }
}
