use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    assets::decode::ImageFileSource,
    filters::{
        alpha_map::AlphaMapFilter,
        alpha_mask::AlphaMaskFilter,
        box_blur::BoxBlurFilter,
        channel::Overflow,
        color::ColorFilter,
        color_matrix::{ColorMatrix, ColorMatrixFilter},
        filter::Filter,
    },
    foundation::error::{FilterError, FilterResult},
    pipeline::chain::{ErrorPolicy, FilterChain},
};

/// One filter in a serialized chain: a kind plus free-form parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterInstance {
    /// Filter kind, e.g. `"box_blur"` or `"color_matrix"`.
    pub kind: String,
    /// Kind-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Serialized filter chain, typically loaded from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChainConfig {
    /// Stages in application order.
    pub filters: Vec<FilterInstance>,
    /// Failure handling for the built chain.
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl ChainConfig {
    /// Parse a chain description from a JSON file.
    pub fn from_path(path: &Path) -> FilterResult<Self> {
        let f = File::open(path).with_context(|| format!("open chain '{}'", path.display()))?;
        let cfg = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| FilterError::validation(format!("parse chain JSON: {e}")))?;
        Ok(cfg)
    }

    /// Build the chain; relative map/mask paths resolve against `assets_root`.
    pub fn build(&self, assets_root: &Path) -> FilterResult<FilterChain> {
        let filters = self
            .filters
            .iter()
            .map(|inst| parse_filter(inst, assets_root))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(FilterChain::from_filters(filters).with_policy(self.on_error))
    }
}

/// Turn one serialized filter into a live filter.
pub fn parse_filter(inst: &FilterInstance, assets_root: &Path) -> FilterResult<Box<dyn Filter>> {
    let kind = inst.kind.trim().to_ascii_lowercase().replace('-', "_");
    if kind.is_empty() {
        return Err(FilterError::validation("filter kind must be non-empty"));
    }
    let params = &inst.params;
    if !params.is_null() && !params.is_object() {
        return Err(FilterError::validation(format!(
            "params of '{kind}' must be an object"
        )));
    }

    match kind.as_str() {
        "color" | "colorfilter" | "color_filter" => {
            let multipliers = get_channels(params, "multipliers", 1.0)?;
            let offsets = get_channels(params, "offsets", 0.0)?;
            let overflow = get_overflow(params)?;
            Ok(Box::new(
                ColorFilter::new(multipliers, offsets).with_overflow(overflow),
            ))
        }
        "color_matrix" | "colormatrix" | "color_matrix_filter" => {
            let overflow = get_overflow(params)?;
            let filter = match params.get("matrix") {
                Some(v) => ColorMatrixFilter::from_slice(&get_numbers(v, "matrix")?),
                None => {
                    let preset = ColorMatrix::with_adjustments(
                        get_f64(params, "brightness")?.unwrap_or(0.0),
                        get_f64(params, "contrast")?.unwrap_or(0.0),
                        get_f64(params, "saturation")?.unwrap_or(0.0),
                        get_f64(params, "hue")?.unwrap_or(0.0),
                    );
                    ColorMatrixFilter::from_matrix(&preset)
                }
            };
            Ok(Box::new(filter.with_overflow(overflow)))
        }
        "alpha_map" | "alphamap" => {
            let source = get_source(params, assets_root, "alpha_map")?;
            Ok(Box::new(AlphaMapFilter::new(Arc::new(source))))
        }
        "alpha_mask" | "alphamask" => {
            let source = get_source(params, assets_root, "alpha_mask")?;
            Ok(Box::new(AlphaMaskFilter::new(Arc::new(source))))
        }
        "box_blur" | "boxblur" | "blur" => {
            // Non-numeric radii count as 0 and non-numeric quality as 1.
            let number = |key: &str| params.get(key).and_then(|v| v.as_f64());
            Ok(Box::new(BoxBlurFilter::from_f64(
                number("blur_x").unwrap_or(0.0),
                number("blur_y").unwrap_or(0.0),
                number("quality").unwrap_or(f64::NAN),
            )))
        }
        _ => Err(FilterError::validation(format!(
            "unknown filter kind '{kind}'"
        ))),
    }
}

fn get_f64(obj: &serde_json::Value, key: &str) -> FilterResult<Option<f64>> {
    let Some(v) = obj.get(key) else {
        return Ok(None);
    };
    let Some(n) = v.as_f64() else {
        return Err(FilterError::validation(format!(
            "filter param '{key}' must be a number"
        )));
    };
    Ok(Some(n))
}

fn get_numbers(v: &serde_json::Value, key: &str) -> FilterResult<Vec<f64>> {
    let Some(arr) = v.as_array() else {
        return Err(FilterError::validation(format!(
            "filter param '{key}' must be an array"
        )));
    };
    arr.iter()
        .map(|n| {
            n.as_f64().ok_or_else(|| {
                FilterError::validation(format!("filter param '{key}' entries must be numbers"))
            })
        })
        .collect()
}

fn get_channels(obj: &serde_json::Value, key: &str, default: f64) -> FilterResult<[f64; 4]> {
    let Some(v) = obj.get(key) else {
        return Ok([default; 4]);
    };
    let values = get_numbers(v, key)?;
    <[f64; 4]>::try_from(values.as_slice()).map_err(|_| {
        FilterError::validation(format!("filter param '{key}' must have length 4 (r, g, b, a)"))
    })
}

fn get_overflow(obj: &serde_json::Value) -> FilterResult<Overflow> {
    match obj.get("overflow") {
        None => Ok(Overflow::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|_| {
            FilterError::validation("filter param 'overflow' must be \"wrap\" or \"clamp\"")
        }),
    }
}

fn get_source(
    obj: &serde_json::Value,
    assets_root: &Path,
    kind: &str,
) -> FilterResult<ImageFileSource> {
    let Some(rel) = obj.get("source").and_then(|v| v.as_str()) else {
        return Err(FilterError::validation(format!(
            "{kind} requires a string param 'source'"
        )));
    };
    let rel = PathBuf::from(rel);
    let path = if rel.is_absolute() {
        rel
    } else {
        assets_root.join(rel)
    };
    Ok(ImageFileSource::new(path))
}

#[cfg(test)]
#[path = "../../tests/unit/config/chain.rs"]
mod tests;
