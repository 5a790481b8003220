//! Interactive grid encoding.
//!
//! Walks a [`GridView`] row by row, turns every sampled pixel into the
//! codepoint of its feature key, then gathers the attributes of every key
//! that was seen. The result is a [`UtfGrid`] ready to be serialized.
//!
//! Pixels whose id has no key are skipped without leaving a placeholder,
//! so rows are only as long as the number of resolvable samples in them.
//! Background pixels are recognised by [`BASE_ID`](crate::grid::BASE_ID)
//! alone, never by key text.

use crate::codepoint::{CodepointAllocator, MAX_KEYS};
use crate::grid::{GridView, ResolvedKey};
use crate::utfgrid::UtfGrid;
use thiserror::Error;

/// Default downsampling stride.
pub const DEFAULT_RESOLUTION: u32 = 4;

/// Error type for encoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Resolution must be at least 1
    #[error("invalid resolution {0}, must be at least 1")]
    InvalidResolution(u32),
    /// More distinct keys than codepoints available
    #[error("too many distinct keys, limit is {limit}")]
    TooManyKeys { limit: usize },
}

/// Options controlling a single encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Sampling stride applied to both axes
    pub resolution: u32,
    /// Maximum number of distinct keys, capped at [`MAX_KEYS`]
    pub max_keys: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { resolution: DEFAULT_RESOLUTION, max_keys: MAX_KEYS }
    }
}

impl EncodeOptions {
    pub fn with_resolution(resolution: u32) -> Self {
        Self { resolution, ..Default::default() }
    }
}

/// Encode a grid snapshot into an interactive grid.
///
/// # Errors
///
/// * [`EncodeError::InvalidResolution`] if `options.resolution` is 0
/// * [`EncodeError::TooManyKeys`] if the grid holds more distinct keys than
///   `options.max_keys`
///
/// # Example
///
/// ```
/// use utfgrid::encoder::{encode, EncodeOptions};
/// use utfgrid::grid::{GridBuffer, BASE_ID};
/// use utfgrid::models::FeatureRecord;
///
/// let mut grid = GridBuffer::new(2, 1);
/// grid.add_field("name");
/// grid.insert_feature(1, "k1", FeatureRecord::new().with("name", "Alice"));
/// grid.set_row(0, &[1, BASE_ID]);
///
/// let encoded = encode(&grid.view(), &EncodeOptions::with_resolution(1)).unwrap();
/// assert_eq!(encoded.keys, vec!["k1", ""]);
/// assert_eq!(encoded.grid, vec![" !"]);
/// assert_eq!(
///     encoded.to_json().unwrap(),
///     r#"{"keys":["k1",""],"data":{"k1":{"name":"Alice"}},"grid":[" !"]}"#
/// );
/// ```
pub fn encode(view: &GridView<'_>, options: &EncodeOptions) -> Result<UtfGrid, EncodeError> {
    if options.resolution < 1 {
        return Err(EncodeError::InvalidResolution(options.resolution));
    }
    let step = options.resolution as usize;

    let mut allocator = CodepointAllocator::with_limit(options.max_keys);
    let rows = encode_rows(view, step, &mut allocator)?;

    let keys: Vec<String> = allocator.keys().iter().map(|key| key.as_str().to_string()).collect();
    let data = collect_attributes(view, allocator.keys());

    log::debug!(
        "encoded {}x{} grid at resolution {}: {} rows, {} keys, {} features",
        view.width(),
        view.height(),
        options.resolution,
        rows.len(),
        keys.len(),
        data.len()
    );

    Ok(UtfGrid { keys, data, grid: rows })
}

/// Encode the sampled rows, allocating codepoints as keys are first seen.
fn encode_rows<'a>(
    view: &GridView<'a>,
    step: usize,
    allocator: &mut CodepointAllocator<ResolvedKey<'a>>,
) -> Result<Vec<String>, EncodeError> {
    if view.width() == 0 {
        return Ok(Vec::new());
    }
    let mut rows = Vec::with_capacity(view.height().div_ceil(step));

    for y in (0..view.height()).step_by(step) {
        let ids = view.row(y);
        let mut row = String::with_capacity(view.width().div_ceil(step));
        for &id in ids.iter().step_by(step) {
            let Some(key) = view.resolve_key(id) else {
                continue;
            };
            let cp = allocator.allocate(key).map_err(|e| {
                log::warn!("grid exceeds {} distinct keys at row {}", e.limit, y);
                EncodeError::TooManyKeys { limit: e.limit }
            })?;
            row.push(cp);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Build the `data` table: one attribute object per feature key that has a
/// feature record, in allocation order. The background never gets one.
fn collect_attributes(
    view: &GridView<'_>,
    keys: &[ResolvedKey<'_>],
) -> serde_json::Map<String, serde_json::Value> {
    let mut data = serde_json::Map::new();

    for key in keys {
        let ResolvedKey::Feature(key) = *key else {
            continue;
        };
        let Some(feature) = view.feature(key) else {
            continue;
        };

        let mut object = serde_json::Map::new();
        for field in view.fields() {
            let Some(value) = feature.get(field) else {
                continue;
            };
            match value.to_json() {
                Some(json) => {
                    object.insert(field.clone(), json);
                }
                None if !value.is_null() => {
                    log::debug!("dropping non-finite value of field '{}' on '{}'", field, key);
                }
                None => {}
            }
        }
        data.insert(key.to_string(), serde_json::Value::Object(object));
    }

    data
}

/// Encode a grid and serialize it to compact JSON.
///
/// Returns `None` when there is no grid, when `resolution` is 0, when the
/// grid has too many distinct keys, or if serialization fails. Unresolvable
/// pixels are not an error.
pub fn grid_to_json(grid: Option<&GridView<'_>>, resolution: u32) -> Option<String> {
    let view = grid?;
    let encoded = match encode(view, &EncodeOptions::with_resolution(resolution)) {
        Ok(encoded) => encoded,
        Err(e) => {
            log::warn!("grid encoding failed: {}", e);
            return None;
        }
    };
    match encoded.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("grid serialization failed: {}", e);
            None
        }
    }
}
