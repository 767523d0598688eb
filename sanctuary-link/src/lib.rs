//! Stateless, link-shareable sanctuary configurations.
//!
//! There is no database: the whole [`Configuration`] is encrypted into the
//! link itself.
//!
//! ```text
//! Plain ──package──▶ Packaged ──open──▶ Locked ──unlock──▶ Unlocked
//!                                  └──(no passcode tier)──▶ Unlocked
//! ```
//!
//! - The outer payload (`d`, `iv`, `v`) sits in the query string.
//! - The master key sits in the fragment and never reaches a server.
//! - Notes and video are sealed a second time under a passcode-derived key
//!   unless the creator kept the default passcode.
//!
//! The state machine is tracked by the caller through [`OpenedSanctuary`];
//! nothing here holds shared mutable state.

mod error;
pub mod link;
pub mod model;
pub mod protocol;
pub mod schema;
pub mod settings;

pub use error::{LinkError, LinkResult};
pub use link::{SanctuaryLink, SanctuaryPayload};
pub use model::{Configuration, Note, PartnerNames, DEFAULT_TOTAL_DAYS, MAX_NOTE_DAY};
pub use protocol::{open, package, OpenedSanctuary, PackagedSanctuary, SanctuaryState};
pub use schema::SchemaVersion;
pub use settings::LinkSettings;
