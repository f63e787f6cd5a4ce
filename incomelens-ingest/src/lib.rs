//! incomelens-ingest: provider snapshot envelopes, shape detection and the record normalizer.

pub mod detect;
pub mod error;
pub mod legacy;
pub mod normalize;
pub mod providers;
pub mod types;

pub use detect::{SnapshotShape, detect_shape, from_value, parse_snapshot};
pub use error::{IngestError, Result};
pub use legacy::{LegacySnapshot, LegacyTotals, normalize_legacy};
pub use normalize::{NormalizedSnapshot, SnapshotInput, parse_amount};
pub use providers::Provider;
