//! The listener trie: one node per observed-path prefix, listener
//! records at the exact-path node.

use std::collections::BTreeMap;
use std::rc::Rc;

use trellis_value::Value;

/// A listener registered at one exact path.
pub(crate) struct ListenerRecord {
    pub id: u64,
    pub owner: String,
    pub callback: Rc<dyn Fn(&Value, &Value)>,
}

#[derive(Default)]
pub(crate) struct PathNode {
    records: Vec<ListenerRecord>,
    children: BTreeMap<String, PathNode>,
}

impl PathNode {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.children.is_empty()
    }

    pub fn records(&self) -> &[ListenerRecord] {
        &self.records
    }

    pub fn insert(&mut self, segments: &[&str], record: ListenerRecord) {
        match segments.split_first() {
            None => self.records.push(record),
            Some((head, rest)) => self
                .children
                .entry((*head).to_string())
                .or_default()
                .insert(rest, record),
        }
    }

    /// Removes the record with `id` under `segments`, pruning nodes
    /// that end up with neither records nor children.
    pub fn remove(&mut self, segments: &[&str], id: u64) {
        match segments.split_first() {
            None => self.records.retain(|record| record.id != id),
            Some((head, rest)) => {
                if let Some(child) = self.children.get_mut(*head) {
                    child.remove(rest, id);
                    if child.is_empty() {
                        self.children.remove(*head);
                    }
                }
            }
        }
    }

    pub fn node(&self, segments: &[&str]) -> Option<&PathNode> {
        match segments.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get(*head)?.node(rest),
        }
    }

    /// Visits every descendant that holds records, with the suffix path
    /// leading to it.
    pub fn for_each_descendant(
        &self,
        suffix: &mut Vec<String>,
        visit: &mut impl FnMut(&[String], &[ListenerRecord]),
    ) {
        for (segment, child) in &self.children {
            suffix.push(segment.clone());
            if !child.records.is_empty() {
                visit(suffix, &child.records);
            }
            child.for_each_descendant(suffix, visit);
            suffix.pop();
        }
    }

    /// Drops every record tagged with `owner`. Paths whose last record
    /// was removed by this sweep are reported in `vacated`.
    pub fn remove_owner(
        &mut self,
        owner: &str,
        prefix: &mut Vec<String>,
        vacated: &mut Vec<String>,
    ) {
        let had_records = !self.records.is_empty();
        self.records.retain(|record| record.owner != owner);
        if had_records && self.records.is_empty() {
            vacated.push(prefix.join("."));
        }
        for (segment, child) in self.children.iter_mut() {
            prefix.push(segment.clone());
            child.remove_owner(owner, prefix, vacated);
            prefix.pop();
        }
    }

    pub fn prune(&mut self) {
        for child in self.children.values_mut() {
            child.prune();
        }
        self.children.retain(|_, child| !child.is_empty());
    }
}
