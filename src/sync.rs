//! Mirrored numeric/range control pairs.
//!
//! The form shows several values twice: a number box and a slider sharing a
//! sync key. The registry is built once at startup from the declared
//! controls; after that, an input on either member copies its value verbatim
//! (as a string) to the partner. No coercion or clamping happens here — the
//! declared field domains are the only bound, checked at serialization.

use crate::fields::{FieldId, FIELD_SPECS};
use crate::surface::Surface;

/// Which member of a synced pair an input event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSide {
    Number,
    Range,
}

impl SyncSide {
    pub fn partner(self) -> SyncSide {
        match self {
            SyncSide::Number => SyncSide::Range,
            SyncSide::Range => SyncSide::Number,
        }
    }
}

struct SyncPair {
    key: String,
    field: FieldId,
}

/// Registry of number/range pairs keyed by shared identifier.
pub struct SyncRegistry {
    pairs: Vec<SyncPair>,
}

impl SyncRegistry {
    /// Pair up declared controls. A pair is registered only when a number
    /// control's key also appears among the range controls; unmatched number
    /// controls are ignored.
    pub fn from_declared(numbers: &[(&str, FieldId)], ranges: &[&str]) -> Self {
        let pairs = numbers
            .iter()
            .filter(|(key, _)| ranges.contains(key))
            .map(|(key, field)| SyncPair {
                key: (*key).to_string(),
                field: *field,
            })
            .collect();
        Self { pairs }
    }

    /// The standard form layout: every field that declares a sync key has
    /// both controls present.
    pub fn standard() -> Self {
        let declared: Vec<(&str, FieldId)> = FIELD_SPECS
            .iter()
            .filter_map(|spec| spec.sync_key.map(|key| (key, spec.id)))
            .collect();
        let ranges: Vec<&str> = declared.iter().map(|(key, _)| *key).collect();
        Self::from_declared(&declared, &ranges)
    }

    /// Whether a key has a registered pair.
    pub fn is_registered(&self, key: &str) -> bool {
        self.pairs.iter().any(|pair| pair.key == key)
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Handle an input event on one member: copy the value to the partner
    /// control. Returns the backing field so the caller can store the value,
    /// or `None` when the key has no registered pair (the event is ignored).
    pub fn mirror_input<S: Surface>(
        &self,
        key: &str,
        side: SyncSide,
        value: &str,
        surface: &mut S,
    ) -> Option<FieldId> {
        let pair = self.pairs.iter().find(|pair| pair.key == key)?;
        surface.set_sync_control(&pair.key, side.partner(), value);
        Some(pair.field)
    }

    /// Write a value to both members of a pair (used when presets or other
    /// programmatic writes change the backing field). Returns the backing
    /// field, or `None` when the key has no registered pair.
    pub fn write_pair<S: Surface>(
        &self,
        key: &str,
        value: &str,
        surface: &mut S,
    ) -> Option<FieldId> {
        let pair = self.pairs.iter().find(|pair| pair.key == key)?;
        surface.set_sync_control(&pair.key, SyncSide::Number, value);
        surface.set_sync_control(&pair.key, SyncSide::Range, value);
        Some(pair.field)
    }
}
