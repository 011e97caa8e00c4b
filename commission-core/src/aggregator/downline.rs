//! Sponsorship Chain Walks
//!
//! Downline: beneficiary -> accounts it sponsored -> ... (four levels).
//! Upline: purchaser -> its sponsor -> ... (four hops).
//!
//! Both walks track visited account ids so corrupt, cyclic sponsorship
//! data terminates even if the depth cap were raised.

use super::SponsorIndex;
use crate::types::*;
use std::collections::{BTreeSet, HashSet};

/// Level-by-level downline walk
///
/// Drives the walk one level at a time so callers can fetch each level in
/// whatever batches their store allows: read [`frontier`](Self::frontier),
/// fetch the accounts sponsored by those handles, then [`advance`](Self::advance).
#[derive(Clone, Debug)]
pub struct DownlineWalk {
    visited: HashSet<AccountId>,
    frontier: Vec<Handle>,
    levels: Vec<Vec<Account>>,
}

impl DownlineWalk {
    /// Start a walk below `beneficiary`
    pub fn new(beneficiary: &Account) -> Self {
        let mut visited = HashSet::new();
        visited.insert(beneficiary.account_id.clone());

        let frontier = if beneficiary.handle.is_empty() {
            Vec::new()
        } else {
            vec![beneficiary.handle.clone()]
        };

        Self {
            visited,
            frontier,
            levels: Vec::with_capacity(LEVELS_PER_TABLE),
        }
    }

    /// Level the next [`advance`](Self::advance) will fill
    pub fn next_level(&self) -> Option<CommissionLevel> {
        if self.frontier.is_empty() {
            return None;
        }
        CommissionLevel::new(self.levels.len() as u8 + 1).ok()
    }

    /// Walk has reached level four or ran out of sponsored accounts
    pub fn is_complete(&self) -> bool {
        self.next_level().is_none()
    }

    /// Handles whose sponsored accounts make up the next level
    pub fn frontier(&self) -> &[Handle] {
        if self.is_complete() {
            &self.frontier[..0]
        } else {
            self.frontier.as_slice()
        }
    }

    /// Record the accounts found for the current frontier.
    ///
    /// Accounts not sponsored by a frontier handle, or already seen in this
    /// walk, are dropped. Calling this on a complete walk does nothing.
    pub fn advance(&mut self, found: impl IntoIterator<Item = Account>) {
        if self.is_complete() {
            return;
        }

        let frontier: HashSet<&Handle> = self.frontier.iter().collect();
        let mut level: Vec<Account> = Vec::new();
        for account in found {
            let sponsored = account
                .sponsor()
                .map(|s| frontier.contains(s))
                .unwrap_or(false);
            if sponsored && self.visited.insert(account.account_id.clone()) {
                level.push(account);
            }
        }
        level.sort_by(|a, b| a.account_id.cmp(&b.account_id));

        let next: BTreeSet<Handle> = level
            .iter()
            .filter(|a| !a.handle.is_empty())
            .map(|a| a.handle.clone())
            .collect();

        self.frontier = next.into_iter().collect();
        self.levels.push(level);
    }

    /// Finish the walk
    pub fn finish(self) -> DownlineLevels {
        DownlineLevels {
            levels: self.levels,
        }
    }
}

/// Purchasers grouped by sponsorship level below one beneficiary
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownlineLevels {
    levels: Vec<Vec<Account>>,
}

impl DownlineLevels {
    /// Walk the downline of `beneficiary` through an in-memory index
    pub fn walk(beneficiary: &Account, index: &SponsorIndex) -> Self {
        let mut walk = DownlineWalk::new(beneficiary);
        while !walk.is_complete() {
            let found: Vec<Account> = walk
                .frontier()
                .iter()
                .flat_map(|handle| index.sponsored_by(handle))
                .cloned()
                .collect();
            walk.advance(found);
        }
        walk.finish()
    }

    /// Accounts at `level`
    pub fn level(&self, level: CommissionLevel) -> &[Account] {
        self.levels
            .get(level.index())
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Non-empty levels in order
    pub fn iter(&self) -> impl Iterator<Item = (CommissionLevel, &[Account])> + '_ {
        CommissionLevel::ALL
            .into_iter()
            .map(move |level| (level, self.level(level)))
            .filter(|(_, accounts)| !accounts.is_empty())
    }

    /// Deepest level reached
    pub fn depth(&self) -> usize {
        self.levels.iter().filter(|l| !l.is_empty()).count()
    }

    /// Total accounts across all levels
    pub fn account_count(&self) -> usize {
        self.levels.iter().map(|l| l.len()).sum()
    }
}

/// Sponsors above `purchaser`, nearest first, at most four hops.
///
/// Stops at a missing sponsor handle or an account already on the chain.
pub fn upline_chain<'a>(
    purchaser: &Account,
    index: &'a SponsorIndex,
) -> Vec<(CommissionLevel, &'a Account)> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(purchaser.account_id.clone());

    let mut current = index.sponsor_of(purchaser);
    for level in CommissionLevel::ALL {
        let Some(sponsor) = current else {
            break;
        };
        if !visited.insert(sponsor.account_id.clone()) {
            break;
        }
        chain.push((level, sponsor));
        current = index.sponsor_of(sponsor);
    }

    chain
}
