//! Plan tiers and premium signatures for Sanctuary.
//!
//! After payment the issuing server signs `(plan, partner names)` with a
//! shared secret. The signature travels inside the encrypted configuration
//! so a viewer can show a "verified" badge without any database lookup.
//!
//! The signature is advisory. Forging one only changes client-rendered
//! cosmetics; it is not an authorization boundary and must not be turned
//! into one without a server-side check on every render.

mod error;
mod plan;
pub mod premium;
mod secret;
pub mod signature;

pub use error::{LicenseError, LicenseResult};
pub use plan::{Plan, DEFAULT_PASSCODE};
pub use premium::{PremiumCheckRequest, PremiumCheckResponse};
pub use secret::{SigningSecret, SIGNING_SECRET_ENV};
pub use signature::{canonical_message, sign, verify};
