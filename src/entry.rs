// Quote Entry - Catalog line item with stable identity
//
// Entry name/price/category are VALUES (can change), Entry UUID is IDENTITY
// (never changes). Renaming or repricing an entry does not orphan its comment
// or its place in the current quote.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable identifier of a catalog entry (UUID v4 string).
pub type EntryId = String;

// ============================================================================
// ENTRY ENTITY
// ============================================================================

/// One catalog line item.
///
/// Identity: `id` (UUID, never changes, never persisted)
/// Values: name, price, category
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Stable identity - generated at construction or load
    pub id: EntryId,

    /// Human-readable description (e.g., "Bouquet de novia")
    pub name: String,

    /// Non-negative price, currency-agnostic unit
    pub price: f64,

    /// Free-form category label (user-extensible taxonomy)
    pub category: String,
}

impl Entry {
    /// Create a new entry with a fresh UUID
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Entry {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }

    /// Compute the value fingerprint over (name, price, category).
    ///
    /// NOTE: This is for DUPLICATE DETECTION, not identity!
    /// Identity = id (UUID), Deduplication = fingerprint
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}\u{1f}{}\u{1f}{}", self.name, self.price, self.category));
        format!("{:x}", hasher.finalize())
    }

    /// Check the data-model constraints: non-empty name and category,
    /// non-negative price
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.category.is_empty() && self.price >= 0.0 && self.price.is_finite()
    }
}

// ============================================================================
// WIRE RECORD
// ============================================================================

/// The on-disk shape of one catalog record.
///
/// Field names are the storage contract and must round-trip exactly;
/// existing catalog files predate this implementation. The surrogate id is
/// deliberately absent - it is process-local.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "precio")]
    pub price: f64,

    #[serde(rename = "categoria")]
    pub category: String,

    /// Written as "" when the entry has no comment
    #[serde(rename = "comentario", default)]
    pub comment: String,
}

impl EntryRecord {
    /// Build the record for an entry and its (possibly empty) comment
    pub fn from_entry(entry: &Entry, comment: &str) -> Self {
        EntryRecord {
            name: entry.name.clone(),
            price: entry.price,
            category: entry.category.clone(),
            comment: comment.to_string(),
        }
    }

    /// Materialize an in-memory entry, assigning a fresh identity
    pub fn into_entry(self) -> (Entry, String) {
        (Entry::new(self.name, self.price, self.category), self.comment)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("Centro de mesa", 15000.0, "Decoración");

        assert!(!entry.id.is_empty());
        assert_eq!(entry.name, "Centro de mesa");
        assert_eq!(entry.price, 15000.0);
        assert_eq!(entry.category, "Decoración");
        assert!(entry.is_valid());
    }

    #[test]
    fn test_identity_is_per_instance() {
        let a = Entry::new("Corona floral", 35000.0, "Coronas");
        let b = Entry::new("Corona floral", 35000.0, "Coronas");

        // Same values, distinct identities
        assert_ne!(a.id, b.id);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_values() {
        let base = Entry::new("Arreglo de mesa", 25000.0, "Decoración");

        let mut renamed = base.clone();
        renamed.name = "Arreglo grande".to_string();
        assert_ne!(base.fingerprint(), renamed.fingerprint());

        let mut repriced = base.clone();
        repriced.price = 26000.0;
        assert_ne!(base.fingerprint(), repriced.fingerprint());

        let mut recategorized = base.clone();
        recategorized.category = "Bouquets".to_string();
        assert_ne!(base.fingerprint(), recategorized.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let entry = Entry::new("Bouquet de novia", 45000.0, "Bouquets");
        let hash = entry.fingerprint();

        assert_eq!(hash.len(), 64, "SHA-256 hash should be 64 hex characters");
        assert_eq!(hash, entry.fingerprint(), "Fingerprint should be deterministic");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(!Entry::new("", 10.0, "Decoración").is_valid());
        assert!(!Entry::new("Arreglo", 10.0, "").is_valid());
        assert!(!Entry::new("Arreglo", -1.0, "Decoración").is_valid());
        assert!(!Entry::new("Arreglo", f64::NAN, "Decoración").is_valid());
        assert!(Entry::new("Arreglo", 0.0, "Decoración").is_valid());
    }

    #[test]
    fn test_wire_record_field_names() {
        let entry = Entry::new("Corona fúnebre", 30000.0, "Coronas");
        let record = EntryRecord::from_entry(&entry, "con cinta");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nombre"], "Corona fúnebre");
        assert_eq!(json["precio"], 30000.0);
        assert_eq!(json["categoria"], "Coronas");
        assert_eq!(json["comentario"], "con cinta");

        // The surrogate id must never leak into the wire format
        assert!(json.get("id").is_none());
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_wire_record_missing_comment_defaults_empty() {
        let record: EntryRecord =
            serde_json::from_str(r#"{"nombre": "Lazo", "precio": 500.0, "categoria": "Extras"}"#)
                .unwrap();

        assert_eq!(record.comment, "");

        let (entry, comment) = record.into_entry();
        assert_eq!(entry.name, "Lazo");
        assert_eq!(comment, "");
    }
}
