use noughts_core::Point;
use web_sys::Element;

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn viewport_size() -> (f32, f32) {
    let window = gloo::utils::window();
    let dimension = |value: Result<wasm_bindgen::JsValue, _>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    (
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}

/// Center of `element` in viewport coordinates.
pub(crate) fn element_center(element: &Element) -> Point {
    let rect = element.get_bounding_client_rect();
    (
        (rect.left() + rect.width() / 2.0) as f32,
        (rect.top() + rect.height() / 2.0) as f32,
    )
}
