// src/lib.rs
// Public library surface for the replay binary and integration tests.

pub mod config;
pub mod model;
pub mod source_kind;
pub mod telemetry;

// Evidence & arbitration engine (extract, score, arbitrate, digest)
pub mod arbitration;
pub mod digest;
pub mod evidence;
pub mod scoring;

// Ingestion edges and output assembly
pub mod candidate;
pub mod clean;
pub mod pipeline;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::arbitration::resolve;
pub use crate::candidate::{parse_candidates, ChangeCandidate};
pub use crate::config::RadarConfig;
pub use crate::digest::{digest, DigestMode};
pub use crate::evidence::{select_evidence, EvidenceSelection};
pub use crate::model::{ArbitrationDecision, ChangeRecord, CollectedItem, EvidenceItem, IncomingItem};
pub use crate::pipeline::{finalize_change, run_topic, RunOutcome};
pub use crate::report::{DecisionRecord, RadarReport};
pub use crate::scoring::score;
pub use crate::source_kind::{infer_source_kind, SourceKind};
