use serde_json::{Map, Value};

use crate::helpers::value::field_is_truthy;
use crate::utils::constants::FIELD_LEAD_SOURCE;

/// Shallow ordered merge, later maps overwrite same-named keys of earlier ones.
pub fn merge_ordered<I>(maps: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    maps.into_iter().fold(Map::new(), |mut merged, map| {
        merged.extend(map);
        merged
    })
}

/// Overlay module data on the caller's token data.
///
/// Module fields win key by key, except `leadSource`: when the caller sent a
/// truthy one, the module's is dropped and the caller's object is kept whole.
pub fn combine(caller_data: Map<String, Value>, mut module_data: Map<String, Value>) -> Map<String, Value> {
    if field_is_truthy(&caller_data, FIELD_LEAD_SOURCE) {
        module_data.remove(FIELD_LEAD_SOURCE);
    }
    merge_ordered([caller_data, module_data])
}
