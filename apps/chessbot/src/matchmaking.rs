//! Mutual-consent handshake between two humans.
//!
//! A solicitation `requester -> target` is recorded as a pending edge. The
//! game starts only when the target solicits the requester back. The
//! automated opponent never needs to consent.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::UserId;
use crate::errors::domain::DomainError;
use crate::realm::Realm;

/// Directed solicitation edges, requester to targets. Repeating a
/// solicitation does not add a second edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRequests {
    edges: BTreeMap<UserId, BTreeSet<UserId>>,
}

impl PendingRequests {
    pub fn contains(&self, requester: &UserId, target: &UserId) -> bool {
        self.edges
            .get(requester)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Returns `false` if the edge was already present.
    pub fn insert(&mut self, requester: UserId, target: UserId) -> bool {
        self.edges.entry(requester).or_default().insert(target)
    }

    pub fn remove(&mut self, requester: &UserId, target: &UserId) -> bool {
        let Some(targets) = self.edges.get_mut(requester) else {
            return false;
        };
        let removed = targets.remove(target);
        if targets.is_empty() {
            self.edges.remove(requester);
        }
        removed
    }

    pub fn pending_from(&self, requester: &UserId) -> Vec<UserId> {
        self.edges
            .get(requester)
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Every edge as `(requester, target)`, in id order.
    pub fn edges(&self) -> impl Iterator<Item = (&UserId, &UserId)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Edge recorded; the target has not asked back yet.
    AwaitingReciprocation,
    /// Both sides agreed (or the target is automated). The caller creates the
    /// session before releasing the realm lock.
    Matched,
}

/// Evaluate a `start` request. Rejections leave the realm untouched.
pub fn request_match(
    realm: &mut Realm,
    requester: &UserId,
    target: &UserId,
    automated: &UserId,
) -> Result<MatchStatus, DomainError> {
    if requester == target {
        return Err(DomainError::SelfPlayNotAllowed);
    }
    if realm.sessions.is_in_session(requester) {
        return Err(DomainError::AlreadyInSession);
    }
    let target_is_automated = target == automated;
    if !target_is_automated && realm.sessions.is_in_session(target) {
        return Err(DomainError::TargetAlreadyInSession);
    }
    if target_is_automated {
        return Ok(MatchStatus::Matched);
    }

    if !realm.pending.contains(target, requester) {
        realm.pending.insert(requester.clone(), target.clone());
        debug!(
            realm = %realm.id(),
            requester = %requester,
            target = %target,
            "Solicitation recorded"
        );
        return Ok(MatchStatus::AwaitingReciprocation);
    }

    realm.pending.remove(target, requester);
    realm.pending.remove(requester, target);
    debug!(
        realm = %realm.id(),
        requester = %requester,
        target = %target,
        "Solicitation reciprocated"
    );
    Ok(MatchStatus::Matched)
}
