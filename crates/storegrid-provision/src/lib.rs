//! storegrid-provision — the provisioning orchestrator.
//!
//! Decides, for each requested or existing store, what action to take
//! next: admission against the capacity guardrail, identity allocation,
//! idempotent creation, bounded readiness polling, and audit recording.
//! The orchestrator is a stateless re-deriver of store status — it keeps
//! no tenant records and reconstructs everything from observed cluster
//! state.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!   ├── AdmissionController (gate mutex + in-flight reservation tickets)
//!   ├── IdentityAllocator   (store-<token> ids, <id>.<domain> hosts)
//!   ├── ClusterClient       (existence probe, pod sampling, deletion)
//!   ├── ReleaseManager      (parameterized install / uninstall)
//!   ├── readiness poll loop (bounded, cancellable)
//!   ├── AuditLog            (ordered Created/Deleted events)
//!   └── per-store lock map  (serializes create/delete on one id)
//! ```

pub mod error;
pub mod guardrail;
pub mod identity;
pub mod orchestrator;
pub mod poller;

pub use error::{ProvisionError, ProvisionResult};
pub use guardrail::{Admission, AdmissionController, AdmissionTicket};
pub use identity::{IdentityAllocator, RandomIdentity, SequentialIdentity, StoreIdentity};
pub use orchestrator::{CreateOutcome, Orchestrator};
pub use poller::{PollBudget, PollOutcome};
