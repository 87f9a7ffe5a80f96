#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory occurrence document store.
//!
//! Stands in for the document database the deployment targets: a single
//! append-only collection behind an `RwLock`, shared across request
//! handlers. Occurrences are inserted once and never updated or deleted;
//! searches take a snapshot and evaluate the query filter against it, so
//! readers never observe a partially applied write.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rope_occurrence_models::{NewOccurrence, Occurrence};
use rope_query::OccurrenceFilter;
use uuid::Uuid;

/// Shared occurrence collection.
#[derive(Debug, Default)]
pub struct OccurrenceStore {
    occurrences: RwLock<Vec<Occurrence>>,
}

impl OccurrenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new occurrence, assigning its id and creation instant.
    ///
    /// `now` is supplied by the caller so that creation timestamps share
    /// the request's evaluation instant.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn insert(&self, new: NewOccurrence, now: DateTime<Utc>) -> Occurrence {
        let occurrence = Occurrence {
            id: Uuid::new_v4(),
            occurrence_type: new.occurrence_type,
            description: new.description,
            location: new.location,
            photo_url: new.photo_url,
            created_at: now,
        };

        self.occurrences
            .write()
            .expect("occurrence store lock poisoned")
            .push(occurrence.clone());

        occurrence
    }

    /// Returns the occurrences matching `filter`, sorted newest-first.
    ///
    /// Read-only with respect to the stored records.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn search(&self, filter: &OccurrenceFilter) -> Vec<Occurrence> {
        let occurrences = self
            .occurrences
            .read()
            .expect("occurrence store lock poisoned");
        filter.apply(occurrences.iter())
    }

    /// Returns the number of stored occurrences.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences
            .read()
            .expect("occurrence store lock poisoned")
            .len()
    }

    /// Returns whether the store holds no occurrences.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
