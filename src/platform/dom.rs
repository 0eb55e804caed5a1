//! Page elements: readout fields and the block height controls

use crate::sim::{MAX_READOUT_POINTS, ReadoutSlot};

/// Canvas the game renders into
pub const CANVAS_ID: &str = "renderCanvas";
/// Range input for the block height
pub const BLOCK_Y_SLIDER_ID: &str = "yPosSlider";
/// Number input mirroring the slider
pub const BLOCK_Y_INPUT_ID: &str = "blockYPos";

/// Element ids a slot writes to, one per field
pub fn readout_element_ids(slot: ReadoutSlot) -> Vec<String> {
    match slot {
        ReadoutSlot::BallX => vec![slot.id().to_owned()],
        _ => (0..MAX_READOUT_POINTS)
            .map(|i| format!("{}{}", slot.id(), i))
            .collect(),
    }
}

/// Block height from an input's value; blanks and junk are ignored
pub fn parse_block_y(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|y| y.is_finite())
}

#[cfg(target_arch = "wasm32")]
pub use web::{DomSink, attach_block_y_controls};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use super::*;
    use crate::sim::{DiagnosticsSink, Readout};

    /// Writes readouts into the page's text elements.
    ///
    /// Elements are looked up once at startup; fields without an element on
    /// the page are skipped.
    pub struct DomSink {
        elements: HashMap<ReadoutSlot, Vec<Option<Element>>>,
    }

    impl DomSink {
        pub fn new(document: &Document) -> Self {
            let elements = ReadoutSlot::ALL
                .into_iter()
                .map(|slot| {
                    let found: Vec<Option<Element>> = readout_element_ids(slot)
                        .iter()
                        .map(|id| document.get_element_by_id(id))
                        .collect();
                    if found.iter().any(Option::is_none) {
                        log::warn!("Page is missing readout elements for {}", slot.id());
                    }
                    (slot, found)
                })
                .collect();
            Self { elements }
        }
    }

    impl DiagnosticsSink for DomSink {
        fn publish(&mut self, slot: ReadoutSlot, value: Readout) {
            let Some(elements) = self.elements.get(&slot) else {
                return;
            };
            for (i, el) in elements.iter().enumerate() {
                if let Some(el) = el {
                    el.set_text_content(Some(&value.field(i)));
                }
            }
        }
    }

    fn input(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no #{id} element")))?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str(&format!("#{id} is not an input")))
    }

    /// Wire the slider and number box to `pending`, keeping them in sync.
    ///
    /// The latest valid value wins; the frame loop takes it from `pending`.
    pub fn attach_block_y_controls(
        document: &Document,
        pending: Rc<Cell<Option<f32>>>,
    ) -> Result<(), JsValue> {
        let slider = input(document, BLOCK_Y_SLIDER_ID)?;
        let number = input(document, BLOCK_Y_INPUT_ID)?;

        for (source, mirror) in [(slider.clone(), number.clone()), (number, slider)] {
            let pending = pending.clone();
            let target = source.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = target.value();
                if let Some(y) = parse_block_y(&value) {
                    mirror.set_value(&value);
                    pending.set(Some(y));
                }
            });
            source.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_ids() {
        assert_eq!(
            readout_element_ids(ReadoutSlot::TopWallSeparations),
            vec!["topBorder0", "topBorder1"]
        );
        assert_eq!(
            readout_element_ids(ReadoutSlot::RacketSeparations),
            vec!["racket0", "racket1"]
        );
        assert_eq!(readout_element_ids(ReadoutSlot::BallX), vec!["ballXPos"]);
    }

    #[test]
    fn test_parse_block_y() {
        assert_eq!(parse_block_y("42"), Some(42.0));
        assert_eq!(parse_block_y(" -17.5 "), Some(-17.5));
        assert_eq!(parse_block_y(""), None);
        assert_eq!(parse_block_y("abc"), None);
        assert_eq!(parse_block_y("inf"), None);
    }
}
