//! Feature-reference grids.
//!
//! A [`GridBuffer`] owns a dense `width * height` array of feature-reference
//! ids together with the lookup tables the encoder needs: id -> feature key,
//! key -> [`FeatureRecord`], and the ordered list of fields to serialize.
//! The encoder never touches the buffer directly; it works on a [`GridView`],
//! an immutable snapshot that borrows all of those pieces at once.

use crate::models::FeatureRecord;
use std::collections::HashMap;

/// Feature-reference id stored per pixel.
pub type FeatureId = i64;

/// Sentinel id meaning "no feature covers this pixel".
///
/// The sentinel always resolves to [`ResolvedKey::Base`], whatever the key
/// table says about it.
pub const BASE_ID: FeatureId = i64::MIN;

/// What a feature-reference id resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedKey<'a> {
    /// The background sentinel
    Base,
    /// A feature key
    Feature(&'a str),
}

impl<'a> ResolvedKey<'a> {
    /// Text written to the `keys` list, `""` for the background.
    pub fn as_str(&self) -> &'a str {
        match self {
            ResolvedKey::Base => "",
            ResolvedKey::Feature(key) => key,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, ResolvedKey::Base)
    }
}

/// Owned feature-reference grid plus its lookup tables.
#[derive(Debug, Clone)]
pub struct GridBuffer {
    width: usize,
    height: usize,
    ids: Vec<FeatureId>,
    keys: HashMap<FeatureId, String>,
    features: HashMap<String, FeatureRecord>,
    fields: Vec<String>,
}

impl GridBuffer {
    /// Create a grid filled with [`BASE_ID`].
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows or cannot be allocated. Use
    /// [`GridBuffer::try_new`] for sizes that come from untrusted input.
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_ids(width, height, vec![BASE_ID; width * height])
    }

    /// Create a grid filled with [`BASE_ID`], or `None` if the buffer size
    /// overflows or the allocation fails.
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        let len = width.checked_mul(height)?;
        let mut ids = Vec::new();
        ids.try_reserve_exact(len).ok()?;
        ids.resize(len, BASE_ID);
        Some(Self::from_ids(width, height, ids))
    }

    fn from_ids(width: usize, height: usize, ids: Vec<FeatureId>) -> Self {
        Self {
            width,
            height,
            ids,
            keys: HashMap::new(),
            features: HashMap::new(),
            fields: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Append a field to the serialized field list. Duplicates are ignored.
    pub fn add_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Replace the serialized field list.
    pub fn set_fields(&mut self, fields: Vec<String>) {
        self.fields.clear();
        for field in fields {
            self.add_field(field);
        }
    }

    /// Map a feature-reference id to its key.
    ///
    /// Returns `false` and stores nothing for [`BASE_ID`].
    pub fn add_key(&mut self, id: FeatureId, key: impl Into<String>) -> bool {
        if id == BASE_ID {
            log::warn!("ignoring key for the background id");
            return false;
        }
        self.keys.insert(id, key.into());
        true
    }

    /// Attach attribute values to a key.
    pub fn add_feature(&mut self, key: impl Into<String>, record: FeatureRecord) {
        self.features.insert(key.into(), record);
    }

    /// Register a feature in one step: id -> key and key -> record.
    pub fn insert_feature(&mut self, id: FeatureId, key: impl Into<String>, record: FeatureRecord) {
        let key = key.into();
        if self.add_key(id, key.clone()) {
            self.add_feature(key, record);
        }
    }

    /// Set the id at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, id: FeatureId) {
        if x < self.width && y < self.height {
            self.ids[y * self.width + x] = id;
        }
    }

    /// Get the id at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<FeatureId> {
        if x < self.width && y < self.height {
            Some(self.ids[y * self.width + x])
        } else {
            None
        }
    }

    /// Fill the rectangle `[x, x + w) x [y, y + h)` with `id`, clipped to the grid.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, id: FeatureId) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.ids[start + x.min(x_end)..start + x_end].fill(id);
        }
    }

    /// Replace a whole row of ids. The row must be exactly `width` long.
    pub fn set_row(&mut self, y: usize, row: &[FeatureId]) -> bool {
        if y >= self.height || row.len() != self.width {
            return false;
        }
        let start = y * self.width;
        self.ids[start..start + self.width].copy_from_slice(row);
        true
    }

    /// Borrow an immutable snapshot for encoding.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            width: self.width,
            height: self.height,
            ids: &self.ids,
            keys: &self.keys,
            features: &self.features,
            fields: &self.fields,
        }
    }
}

/// Read-only snapshot of a grid and its lookup tables.
///
/// Everything is borrowed, so the snapshot cannot outlive the data it was
/// taken from and nothing can mutate that data while it is alive.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    width: usize,
    height: usize,
    ids: &'a [FeatureId],
    keys: &'a HashMap<FeatureId, String>,
    features: &'a HashMap<String, FeatureRecord>,
    fields: &'a [String],
}

impl<'a> GridView<'a> {
    /// Assemble a view from externally owned parts.
    ///
    /// Returns `None` if `ids` does not hold exactly `width * height` entries.
    /// A `keys` entry for [`BASE_ID`] is never consulted.
    pub fn new(
        width: usize,
        height: usize,
        ids: &'a [FeatureId],
        keys: &'a HashMap<FeatureId, String>,
        features: &'a HashMap<String, FeatureRecord>,
        fields: &'a [String],
    ) -> Option<Self> {
        if width.checked_mul(height)? != ids.len() {
            return None;
        }
        Some(Self { width, height, ids, keys, features, fields })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fields(&self) -> &'a [String] {
        self.fields
    }

    /// Raw ids of row `y`.
    pub fn row(&self, y: usize) -> &'a [FeatureId] {
        let start = y * self.width;
        &self.ids[start..start + self.width]
    }

    /// Resolve an id. [`BASE_ID`] is always the background; other ids
    /// resolve through the key table or not at all.
    pub fn resolve_key(&self, id: FeatureId) -> Option<ResolvedKey<'a>> {
        if id == BASE_ID {
            return Some(ResolvedKey::Base);
        }
        self.keys.get(&id).map(|key| ResolvedKey::Feature(key.as_str()))
    }

    /// Resolve a key to its feature record.
    pub fn feature(&self, key: &str) -> Option<&'a FeatureRecord> {
        self.features.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_background() {
        let grid = GridBuffer::new(3, 2);
        assert_eq!(grid.get(0, 0), Some(BASE_ID));
        assert_eq!(grid.get(2, 1), Some(BASE_ID));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.view().resolve_key(BASE_ID), Some(ResolvedKey::Base));
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut grid = GridBuffer::new(4, 4);
        grid.fill_rect(2, 2, 10, 10, 7);
        assert_eq!(grid.get(1, 1), Some(BASE_ID));
        assert_eq!(grid.get(2, 2), Some(7));
        assert_eq!(grid.get(3, 3), Some(7));
        assert_eq!(grid.get(3, 1), Some(BASE_ID));
    }

    #[test]
    fn test_fill_rect_outside_grid_is_noop() {
        let mut grid = GridBuffer::new(2, 2);
        grid.fill_rect(5, 5, 2, 2, 1);
        assert!(grid.view().row(0).iter().chain(grid.view().row(1)).all(|&id| id == BASE_ID));
    }

    #[test]
    fn test_set_row_requires_width() {
        let mut grid = GridBuffer::new(3, 1);
        assert!(!grid.set_row(0, &[1, 2]));
        assert!(grid.set_row(0, &[1, 2, 3]));
        assert_eq!(grid.view().row(0), &[1, 2, 3]);
        assert!(!grid.set_row(1, &[1, 2, 3]));
    }

    #[test]
    fn test_add_field_dedupes() {
        let mut grid = GridBuffer::new(1, 1);
        grid.add_field("name");
        grid.add_field("pop");
        grid.add_field("name");
        assert_eq!(grid.fields(), &["name".to_string(), "pop".to_string()]);
    }

    #[test]
    fn test_resolve_key_unknown_id() {
        let mut grid = GridBuffer::new(1, 1);
        grid.insert_feature(1, "road", FeatureRecord::new());
        let view = grid.view();
        assert_eq!(view.resolve_key(1), Some(ResolvedKey::Feature("road")));
        assert_eq!(view.resolve_key(2), None);
        assert!(view.feature("road").is_some());
    }

    #[test]
    fn test_background_id_cannot_be_keyed() {
        let mut grid = GridBuffer::new(1, 1);
        assert!(!grid.add_key(BASE_ID, "water"));
        grid.insert_feature(BASE_ID, "water", FeatureRecord::new());
        let view = grid.view();
        assert_eq!(view.resolve_key(BASE_ID), Some(ResolvedKey::Base));
        assert!(view.feature("water").is_none());
    }

    #[test]
    fn test_view_ignores_background_entry() {
        let mut keys = HashMap::new();
        keys.insert(BASE_ID, "water".to_string());
        keys.insert(1, "__base__".to_string());
        let features = HashMap::new();
        let ids = [BASE_ID, 1];
        let view = GridView::new(2, 1, &ids, &keys, &features, &[]).unwrap();
        assert_eq!(view.resolve_key(BASE_ID), Some(ResolvedKey::Base));
        assert_eq!(view.resolve_key(1), Some(ResolvedKey::Feature("__base__")));
    }

    #[test]
    fn test_try_new_rejects_huge_sizes() {
        assert!(GridBuffer::try_new(usize::MAX, 2).is_none());
        assert!(GridBuffer::try_new(usize::MAX / 2, 1).is_none());
        let grid = GridBuffer::try_new(3, 2).unwrap();
        assert_eq!(grid.get(2, 1), Some(BASE_ID));
    }

    #[test]
    fn test_resolved_key_text() {
        assert_eq!(ResolvedKey::Base.as_str(), "");
        assert!(ResolvedKey::Base.is_base());
        assert_eq!(ResolvedKey::Feature("lake").as_str(), "lake");
    }

    #[test]
    fn test_view_new_checks_length() {
        let keys = HashMap::new();
        let features = HashMap::new();
        let ids = [1, 2, 3];
        assert!(GridView::new(2, 2, &ids, &keys, &features, &[]).is_none());
        assert!(GridView::new(3, 1, &ids, &keys, &features, &[]).is_some());
        assert!(GridView::new(usize::MAX, 2, &ids, &keys, &features, &[]).is_none());
    }
}
