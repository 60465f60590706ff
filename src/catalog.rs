// Quote Catalog - the catalog/selection manager
//
// Owns the base catalog (durable), the available/selected partition (working
// state), and the comment side-table. Every mutation of the base catalog or
// its comments persists the whole catalog immediately; moving entries between
// the pools never touches disk.

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::entry::{Entry, EntryId, EntryRecord};
use crate::export;
use crate::storage;

// ============================================================================
// CATEGORY FILTER
// ============================================================================

/// Narrows the available pool for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Show every category
    All,

    /// Show only entries whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => wanted == category,
        }
    }
}

// ============================================================================
// QUOTE CATALOG
// ============================================================================

/// The catalog manager. One owned instance per session; the storage path is
/// fixed at construction.
///
/// Invariants:
/// - `available` and `selected` are disjoint id sets drawn from `base`
/// - immediately after load or reset, `available` covers all of `base`
/// - `selected` keeps click order, not catalog order
pub struct QuoteCatalog {
    /// Catalog file backing this instance
    path: PathBuf,

    /// Spreadsheet capability, probed once at construction
    excel_enabled: bool,

    /// The full catalog, insertion order preserved (durable)
    base: Vec<Entry>,

    /// Entries not in the active quote, possibly narrowed by filter (working)
    available: Vec<EntryId>,

    /// The active quote, in selection order (working)
    selected: Vec<EntryId>,

    /// Free-text annotations; absent key = empty comment (durable)
    comments: HashMap<EntryId, String>,
}

impl QuoteCatalog {
    /// Open the catalog at `path`, probing the spreadsheet capability from
    /// the build configuration.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_capability(path, export::excel_available())
    }

    /// Open the catalog at `path` with an explicitly injected spreadsheet
    /// capability.
    ///
    /// A missing file is a normal first run. A file that exists but cannot
    /// be read or parsed is reported and treated as empty; load failures are
    /// never fatal to the caller.
    pub fn with_capability(path: impl Into<PathBuf>, excel_enabled: bool) -> Self {
        let path = path.into();
        let (base, comments) = Self::load(&path);
        let available = base.iter().map(|e| e.id.clone()).collect();

        QuoteCatalog {
            path,
            excel_enabled,
            base,
            available,
            selected: Vec::new(),
            comments,
        }
    }

    fn load(path: &Path) -> (Vec<Entry>, HashMap<EntryId, String>) {
        if !path.exists() {
            println!(
                "Catalog file {} not found. Starting with an empty catalog.",
                path.display()
            );
            return (Vec::new(), HashMap::new());
        }

        match storage::load_records(path) {
            Ok(records) => {
                let mut base = Vec::with_capacity(records.len());
                let mut comments = HashMap::new();

                for record in records {
                    let (entry, comment) = record.into_entry();
                    if !comment.is_empty() {
                        comments.insert(entry.id.clone(), comment);
                    }
                    base.push(entry);
                }

                println!("✓ Loaded {} catalog entries from {}", base.len(), path.display());
                (base, comments)
            }
            Err(err) => {
                eprintln!("❌ Could not load catalog from {}: {:#}", path.display(), err);
                eprintln!("   Starting with an empty catalog.");
                (Vec::new(), HashMap::new())
            }
        }
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    /// Path of the backing catalog file
    pub fn storage_path(&self) -> &Path {
        &self.path
    }

    /// Whether the spreadsheet capability was present at construction
    pub fn excel_enabled(&self) -> bool {
        self.excel_enabled
    }

    /// The full base catalog, in insertion order
    pub fn base(&self) -> &[Entry] {
        &self.base
    }

    /// Look up an entry by id
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.base.iter().find(|e| e.id == id)
    }

    /// Entries currently in the available pool, in pool order
    pub fn available_entries(&self) -> Vec<&Entry> {
        self.available.iter().filter_map(|id| self.entry(id)).collect()
    }

    /// Entries composing the active quote, in selection order
    pub fn selected_entries(&self) -> Vec<&Entry> {
        self.selected.iter().filter_map(|id| self.entry(id)).collect()
    }

    /// Distinct categories present in the base catalog, sorted
    pub fn categories(&self) -> Vec<String> {
        self.base
            .iter()
            .map(|e| e.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of prices over the active quote. Zero when nothing is selected.
    pub fn total(&self) -> f64 {
        self.selected_entries().iter().map(|e| e.price).sum()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Persist the whole base catalog (with comments inlined) to storage.
    ///
    /// Callers that mutate the base or its comments save immediately and
    /// propagate failure without rolling back the in-memory change.
    pub fn save(&self) -> Result<()> {
        let records: Vec<_> = self
            .base
            .iter()
            .map(|e| EntryRecord::from_entry(e, self.comment(&e.id)))
            .collect();

        storage::save_records(&self.path, &records)?;
        println!("✓ Saved {} catalog entries to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Adopt `entries` as the base catalog and persist, but only when the
    /// catalog is still empty. A populated catalog or an empty seed list is
    /// a no-op.
    pub fn seed_initial(&mut self, entries: Vec<Entry>) -> Result<()> {
        if !self.base.is_empty() || entries.is_empty() {
            return Ok(());
        }

        self.available = entries.iter().map(|e| e.id.clone()).collect();
        self.selected.clear();
        self.base = entries;

        self.save()
    }

    // ========================================================================
    // PARTITION OPERATIONS (working state - never persisted)
    // ========================================================================

    /// Recompute the available pool from base minus selected, narrowed by
    /// `filter`.
    ///
    /// This is a pure recomputation; it is also how an active filter gets
    /// reapplied after selection changes.
    pub fn filter_available(&mut self, filter: &CategoryFilter) {
        self.available = self
            .base
            .iter()
            .filter(|e| filter.matches(&e.category))
            .filter(|e| !self.selected.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();
    }

    /// Move an entry into the active quote.
    ///
    /// Returns false when the id is already selected or unknown to the base
    /// catalog.
    pub fn select(&mut self, id: &str) -> bool {
        if self.selected.iter().any(|s| s == id) {
            return false;
        }
        if self.entry(id).is_none() {
            return false;
        }

        self.selected.push(id.to_string());
        self.available.retain(|a| a != id);
        true
    }

    /// Move an entry out of the active quote, back to the available pool
    /// (only while it is still a member of the base catalog).
    ///
    /// Returns false when the id is not currently selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        let Some(pos) = self.selected.iter().position(|s| s == id) else {
            return false;
        };

        self.selected.remove(pos);
        if self.entry(id).is_some() && !self.available.iter().any(|a| a == id) {
            self.available.push(id.to_string());
        }
        true
    }

    /// Discard the current quote: every base entry becomes available again.
    pub fn new_quote(&mut self) {
        self.available = self.base.iter().map(|e| e.id.clone()).collect();
        self.selected.clear();
    }

    // ========================================================================
    // BASE CATALOG MUTATIONS (durable - persist immediately)
    // ========================================================================

    /// Add a new entry to the base catalog and the available pool, then
    /// persist.
    ///
    /// Returns `Ok(None)` without persisting when the fields violate the
    /// data model (empty name/category, negative price) or when an entry
    /// with the same (name, price, category) already exists.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Result<Option<EntryId>> {
        let entry = Entry::new(name, price, category);
        if !entry.is_valid() {
            return Ok(None);
        }

        let fingerprint = entry.fingerprint();
        if self.base.iter().any(|e| e.fingerprint() == fingerprint) {
            return Ok(None);
        }

        let id = entry.id.clone();
        self.base.push(entry);
        self.available.push(id.clone());

        self.save()?;
        Ok(Some(id))
    }

    /// Remove an entry from the base catalog and everywhere it appears,
    /// drop its comment, then persist.
    ///
    /// Returns `Ok(false)` when the id is unknown.
    pub fn remove_entry(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.base.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        self.base.remove(pos);
        self.available.retain(|a| a != id);
        self.selected.retain(|s| s != id);
        self.comments.remove(id);

        self.save()?;
        Ok(true)
    }

    // ========================================================================
    // COMMENTS
    // ========================================================================

    /// The comment for an entry, or "" when none was ever set.
    pub fn comment(&self, id: &str) -> &str {
        self.comments.get(id).map(String::as_str).unwrap_or("")
    }

    /// Set or overwrite the comment for an id and persist.
    ///
    /// Membership in the base catalog is not validated; a comment on an
    /// unknown id simply never reaches storage.
    pub fn set_comment(&mut self, id: &str, comment: &str) -> Result<()> {
        self.comments.insert(id.to_string(), comment.to_string());
        self.save()
    }
}

// ============================================================================
// TESTS
// ============================================================================
