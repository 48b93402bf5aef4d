//! Reactive observation of a value graph by dotted path.
//!
//! A [`ContextManager`] owns one root value. Consumers register
//! callbacks against dotted paths (`"user.address.city"`), mutate the
//! graph through [`ContextManager::set`], and receive synchronous
//! notifications carrying the new and old value. Observation works
//! through missing intermediates: watching `a.b.c` while `a` is still
//! undefined is valid and activates once the structure materializes.
//! Array instances are observed separately through their mutating
//! methods; see [`ContextManager::observe_array`].

mod manager;
mod path;
mod trie;

pub use manager::{ContextManager, Subscription};
pub use path::{resolve_path, split_path};
