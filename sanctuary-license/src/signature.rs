//! HMAC-SHA256 premium signatures.

use crate::error::{LicenseError, LicenseResult};
use crate::plan::Plan;
use crate::secret::SigningSecret;
use hmac::{Hmac, Mac};
use sanctuary_crypto::{decode_url_safe, encode_url_safe};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Builds the signed message `plan:nameA:nameB`.
#[must_use]
pub fn canonical_message(plan: Plan, name_a: &str, name_b: &str) -> String {
    format!("{}:{name_a}:{name_b}", plan.as_str())
}

fn mac_over(message: &str, secret: &SigningSecret) -> LicenseResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| LicenseError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(mac)
}

/// Signs a plan for a pair of partner names. Returns the Base64URL digest.
pub fn sign(
    plan: Plan,
    name_a: &str,
    name_b: &str,
    secret: &SigningSecret,
) -> LicenseResult<String> {
    let mac = mac_over(&canonical_message(plan, name_a, name_b), secret)?;
    let tag = mac.finalize().into_bytes();
    debug!(plan = plan.as_str(), "issued premium signature");
    Ok(encode_url_safe(&tag))
}

/// Checks a signature in constant time.
///
/// Signatures issued under a plan's legacy name (`pro:..`, `spark:..`) are
/// honoured too. Never fails: undecodable or mismatching signatures are
/// simply `false`.
#[must_use]
pub fn verify(
    plan: Plan,
    name_a: &str,
    name_b: &str,
    signature: &str,
    secret: &SigningSecret,
) -> bool {
    let Ok(tag) = decode_url_safe(signature) else {
        return false;
    };
    std::iter::once(plan.as_str())
        .chain(plan.legacy_name())
        .any(|plan_name| {
            mac_over(&format!("{plan_name}:{name_a}:{name_b}"), secret)
                .is_ok_and(|mac| mac.verify_slice(&tag).is_ok())
        })
}
