//! Premium verification request/response.
//!
//! Mirrors the JSON body accepted by the verification endpoint, where both
//! partner names arrive as a single `"nameA:nameB"` string.

use crate::plan::Plan;
use crate::secret::SigningSecret;
use crate::signature::verify;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumCheckRequest {
    pub plan: Plan,
    pub partner_names: String,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumCheckResponse {
    pub success: bool,
}

impl PremiumCheckRequest {
    pub fn new(plan: Plan, name_a: &str, name_b: &str, signature: impl Into<String>) -> Self {
        Self {
            plan,
            partner_names: format!("{name_a}:{name_b}"),
            signature: signature.into(),
        }
    }

    /// Verifies the request. Missing pieces or a name string without a
    /// separator yield `success: false`.
    #[must_use]
    pub fn check(&self, secret: &SigningSecret) -> PremiumCheckResponse {
        let success = match self.partner_names.split_once(':') {
            Some((a, b)) if !self.signature.is_empty() => {
                verify(self.plan, a, b, &self.signature, secret)
            }
            _ => false,
        };
        debug!(plan = self.plan.as_str(), success, "premium check");
        PremiumCheckResponse { success }
    }
}
