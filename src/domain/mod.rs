//! Domain logic - value types independent of the repository provider

pub mod commit;
pub mod release;
pub mod tag;
pub mod version;

pub use commit::Commit;
pub use release::{ReleaseRecord, ReleaseResponse};
pub use tag::{Tag, TagPattern};
pub use version::{Version, VersionBump};
