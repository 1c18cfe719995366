use serde_json::{json, Value};

use crate::feature::{Feature, Properties};

/// Build the output property map of `feature`.
///
/// Boundary and label records carry the same fields; only `group` differs.
/// With `keep_source` the raw source attributes come first and resolved
/// fields overwrite them.
pub fn output_properties(feature: &Feature, keep_source: bool) -> Properties {
    let meta = &feature.metadata;
    let mut props = if keep_source { meta.source.clone() } else { Properties::new() };

    let mut set = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            props.insert(key.to_string(), value);
        }
    };

    set("id", meta.identity.as_ref().map(|id| json!(id.as_str())).or_else(|| feature.raw_id.as_ref().map(|s| json!(s))));
    set("entity", meta.identity.as_ref().map(|id| json!(id.ty().to_str())));
    set("titleShort", meta.title_short.as_ref().map(|s| json!(s)));
    set("titleLong", meta.title_long.as_ref().map(|s| json!(s)));
    set("colorClass", meta.color_class.map(|c| json!(c)));
    set("group", Some(json!(feature.kind.group())));
    set("state", meta.state.as_deref().map(|s| json!(s)));
    set("stateFips", meta.state_fips.map(|c| json!(c)));
    set("district", meta.district.map(|d| json!(d.as_u16())));
    set("congressFirst", meta.congress.map(|c| json!(c.first)));
    set("congressLast", meta.congress.map(|c| json!(c.last)));
    set("startDate", meta.validity.map(|v| json!(v.start().format("%Y-%m-%d").to_string())));
    set("endDate", meta.validity.map(|v| json!(v.end().format("%Y-%m-%d").to_string())));
    set("version", meta.version.as_ref().map(|s| json!(s)));

    props
}
