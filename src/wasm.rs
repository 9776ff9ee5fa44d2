//! WebAssembly exports for the filter worker.
//!
//! These functions are exposed to JavaScript via wasm-bindgen, typically from
//! inside a Web Worker so filtering stays off the page's main thread.
//!
//! - [`apply_filter_wasm`] works on the flat RGBA bytes of an `ImageData`
//! - [`handle_message_wasm`] speaks the JSON message format of
//!   [`crate::worker::handle_message`]

use wasm_bindgen::prelude::*;

use crate::config::FilterOptions;
use crate::convert::{buffer_to_grid, grid_to_buffer};
use crate::error::WorkerError;
use crate::filters::{self, Filter, FilterArgs};
use crate::worker::handle_message;

/// Apply one filter to a flat RGBA buffer.
///
/// # Arguments
/// * `selector` - Filter name, e.g. `"grayscale"` or `"threshold"`
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `arg2`..`arg5` - Optional JSON-encoded filter arguments
///
/// # Returns
/// Flat RGBA bytes of the result. Its dimensions can differ from the input
/// for crop, resize and the layer filters; callers that need them should use
/// [`handle_message_wasm`] instead.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn apply_filter_wasm(
    selector: &str,
    data: &[u8],
    width: usize,
    height: usize,
    arg2: Option<String>,
    arg3: Option<String>,
    arg4: Option<String>,
    arg5: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let to_js = |e: WorkerError| JsValue::from_str(&format!("{}: {}", e.kind(), e));

    let filter = Filter::from_name(selector)
        .ok_or_else(|| to_js(WorkerError::UnknownFilter(selector.to_string())))?;

    let filter_error = |source| WorkerError::Filter {
        selector: selector.to_string(),
        source,
    };
    let input = buffer_to_grid(data, width, height).map_err(|e| to_js(filter_error(e)))?;

    let mut values = Vec::new();
    for raw in [arg2, arg3, arg4, arg5] {
        let value = match raw {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| to_js(WorkerError::from(e)))?
            }
            _ => serde_json::Value::Null,
        };
        values.push(value);
    }
    let args = FilterArgs::from_values(values);

    let output = filters::apply(filter, &input, &args, &FilterOptions::default())
        .map_err(|e| to_js(filter_error(e)))?;

    Ok(grid_to_buffer(&output))
}

/// JSON message in, JSON message out (see [`crate::worker`]).
#[wasm_bindgen]
pub fn handle_message_wasm(message: &str) -> String {
    handle_message(message, &FilterOptions::default())
}
