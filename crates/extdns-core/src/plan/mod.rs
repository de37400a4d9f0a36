//! Changeset planning
//!
//! A [`Plan`] compares the endpoints currently held by a provider against
//! the endpoints desired by the sources and produces [`Changes`].
//!
//! Records are grouped by DNS name. A name's record set is the set of its
//! targets; duplicates within one side collapse to a single record.
//!
//! ```text
//! desired only          -> create
//! both, targets differ  -> update_old (current) + update_new (desired)
//! current only          -> delete
//! both, same targets    -> nothing
//! ```

use crate::endpoint::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Records to create, update and delete in one zone
///
/// Providers receive this as an opaque batch and must apply all of it or
/// report an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    /// Records to create
    pub create: Vec<Endpoint>,
    /// Records being replaced, as they currently exist
    pub update_old: Vec<Endpoint>,
    /// Replacement records, as they should exist
    pub update_new: Vec<Endpoint>,
    /// Records to delete
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// True if there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

/// Desired vs. current endpoints for one zone
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Records the provider currently holds
    pub current: Vec<Endpoint>,
    /// Records the sources want
    pub desired: Vec<Endpoint>,
}

impl Plan {
    /// Create a plan from current and desired endpoints
    pub fn new(current: Vec<Endpoint>, desired: Vec<Endpoint>) -> Self {
        Self { current, desired }
    }

    /// Compute the changes that turn `current` into `desired`
    pub fn calculate(&self) -> Changes {
        let current = RecordSets::group(&self.current);
        let desired = RecordSets::group(&self.desired);

        let mut changes = Changes::default();

        for (name, wanted) in desired.iter() {
            match current.get(name) {
                None => changes.create.extend(wanted.iter().copied().cloned()),
                Some(existing) if !same_targets(existing, wanted) => {
                    changes.update_old.extend(existing.iter().copied().cloned());
                    changes.update_new.extend(wanted.iter().copied().cloned());
                }
                Some(_) => {}
            }
        }

        for (name, existing) in current.iter() {
            if desired.get(name).is_none() {
                changes.delete.extend(existing.iter().copied().cloned());
            }
        }

        changes
    }
}

/// Endpoints grouped by DNS name, in order of first appearance
struct RecordSets<'a> {
    order: Vec<&'a str>,
    sets: HashMap<&'a str, Vec<&'a Endpoint>>,
}

impl<'a> RecordSets<'a> {
    fn group(endpoints: &'a [Endpoint]) -> Self {
        let mut order = Vec::new();
        let mut sets: HashMap<&'a str, Vec<&'a Endpoint>> = HashMap::new();

        for ep in endpoints {
            let set = sets.entry(ep.dns_name.as_str()).or_insert_with(|| {
                order.push(ep.dns_name.as_str());
                Vec::new()
            });
            if !set.iter().any(|existing| existing.target == ep.target) {
                set.push(ep);
            }
        }

        Self { order, sets }
    }

    fn get(&self, name: &str) -> Option<&[&'a Endpoint]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a Endpoint])> + '_ {
        self.order
            .iter()
            .map(move |name| (*name, self.sets[name].as_slice()))
    }
}

fn same_targets(a: &[&Endpoint], b: &[&Endpoint]) -> bool {
    let a: HashSet<&str> = a.iter().map(|ep| ep.target.as_str()).collect();
    let b: HashSet<&str> = b.iter().map(|ep| ep.target.as_str()).collect();
    a == b
}
