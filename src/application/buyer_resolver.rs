//! Buyer Identity Resolver.
//!
//! Turns a loosely populated [`BuyerCandidate`] into a displayable
//! [`ResolvedBuyer`] in three ordered steps:
//!
//! 1. directory query by email, when only an email is known
//! 2. directory fetch by contact id, when name or email is still missing
//! 3. display name composition (first + last, full name, email-derived, `—`)
//!
//! Each lookup step is skipped when its precondition does not hold, and a
//! failed lookup only degrades the result.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{BuyerCandidate, ContactDetails, ResolvedBuyer};
use crate::ports::DirectoryService;

/// Directory lookup steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStep {
    ByEmail,
    ByContactId,
}

impl LookupStep {
    pub const SEQUENCE: [LookupStep; 2] = [LookupStep::ByEmail, LookupStep::ByContactId];

    /// Whether the step runs for the candidate as it stands now.
    ///
    /// The contact id checked is always the one the event supplied; the
    /// email step never introduces one.
    pub fn applies(&self, candidate: &BuyerCandidate) -> bool {
        match self {
            LookupStep::ByEmail => {
                !candidate.has_name() && candidate.has_email() && candidate.contact_id.is_none()
            }
            LookupStep::ByContactId => {
                (!candidate.has_name() || !candidate.has_email())
                    && candidate.contact_id.is_some()
            }
        }
    }
}

/// Resolves buyer identity against the directory service.
#[derive(Clone)]
pub struct BuyerResolver {
    directory: Arc<dyn DirectoryService>,
}

impl BuyerResolver {
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    /// Resolves a raw buyer-like record.
    pub async fn resolve_value(&self, buyer: &Value) -> ResolvedBuyer {
        self.resolve(BuyerCandidate::from_value(buyer)).await
    }

    pub async fn resolve(&self, mut candidate: BuyerCandidate) -> ResolvedBuyer {
        for step in LookupStep::SEQUENCE {
            if step.applies(&candidate) {
                self.run_step(step, &mut candidate).await;
            }
        }
        candidate.into_resolved()
    }

    async fn run_step(&self, step: LookupStep, candidate: &mut BuyerCandidate) {
        match step {
            LookupStep::ByEmail => {
                let email = candidate.email.clone().unwrap_or_default();
                match self.directory.query_by_email(&email).await {
                    Ok(items) => {
                        if let Some(record) = items.first() {
                            candidate.overlay(&ContactDetails::from_record(record));
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Directory query by email failed");
                    }
                }
            }
            LookupStep::ByContactId => {
                let contact_id = candidate.contact_id.clone().unwrap_or_default();
                match self.directory.get_by_id(&contact_id).await {
                    Ok(record) => candidate.fill_missing(&ContactDetails::from_record(&record)),
                    Err(e) => {
                        tracing::warn!(
                            contact_id = %contact_id,
                            error = %e,
                            "Directory fetch by contact id failed"
                        );
                    }
                }
            }
        }
    }
}
