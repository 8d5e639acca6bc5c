//! Typed decoder for the expense service response.
//!
//! The items live at `Envelope/Body/ObtenerDataGastoPIPResponse/DataGasto/Item`.
//! One `Item` and many `Item`s decode to the same `Vec`. Namespace prefixes
//! are ignored.

use itemsync_core::ExpenseItem;
use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

const CONTAINER: &str = "DataGasto";
const ITEM: &str = "Item";
const FAULT: &str = "Fault";

/// Response decoding failures.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(String),

    /// The service answered with a SOAP fault.
    #[error("SOAP fault: {0}")]
    Fault(String),

    /// The body has no `DataGasto` element.
    #[error("response has no {CONTAINER} element")]
    MissingContainer,

    /// An item field could not be converted.
    #[error("invalid item #{index}: {message}")]
    InvalidItem {
        /// Position of the item in the response, starting at 1.
        index: usize,
        /// Conversion error.
        message: String,
    },
}

fn xml_err(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::Xml(e.to_string())
}

/// Fields of the `Item` being read.
#[derive(Default)]
struct ItemFields {
    fields: Vec<(String, String)>,
    current: Option<(String, String)>,
}

/// Decodes the items of a successful response body.
///
/// # Errors
///
/// Returns an error if the body is not XML, is a SOAP fault, lacks the
/// `DataGasto` element or carries an unconvertible field.
pub fn decode_items(body: &str) -> Result<Vec<ExpenseItem>, DecodeError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut seen_container = false;
    let mut fault: Option<String> = None;
    let mut record: Option<ItemFields> = None;
    let mut items = Vec::new();

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref())?;
                if name == FAULT {
                    fault = Some(String::new());
                }
                if let Some(item) = record.as_mut() {
                    if item.current.is_none() {
                        item.current = Some((name.clone(), String::new()));
                    }
                } else if name == ITEM && is_inside_container(&path) {
                    record = Some(ItemFields::default());
                } else if name == CONTAINER {
                    seen_container = true;
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref())?;
                if let Some(item) = record.as_mut() {
                    if item.current.is_none() {
                        item.fields.push((name, String::new()));
                    }
                } else if name == ITEM && is_inside_container(&path) {
                    items.push(finish_item(items.len(), ItemFields::default())?);
                } else if name == CONTAINER {
                    seen_container = true;
                } else if name == FAULT {
                    fault = Some(String::new());
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(xml_err)?;
                if let Some((_, value)) = record.as_mut().and_then(|item| item.current.as_mut()) {
                    value.push_str(&text);
                } else if let Some(message) = fault.as_mut() {
                    if path.last().is_some_and(|p| p == "faultstring") {
                        message.push_str(&text);
                    }
                }
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c).map_err(xml_err)?;
                if let Some((_, value)) = record.as_mut().and_then(|item| item.current.as_mut()) {
                    value.push_str(text);
                }
            }
            Event::End(e) => {
                let name = local_name(e.local_name().as_ref())?;
                path.pop();
                if let Some(mut item) = record.take() {
                    match item.current.take() {
                        Some((field, value)) if field == name => {
                            item.fields.push((field, value));
                            record = Some(item);
                        }
                        Some(open) => {
                            item.current = Some(open);
                            record = Some(item);
                        }
                        None if name == ITEM => {
                            items.push(finish_item(items.len(), item)?);
                        }
                        None => record = Some(item),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(message) = fault {
        return Err(DecodeError::Fault(message));
    }
    if !seen_container {
        return Err(DecodeError::MissingContainer);
    }
    Ok(items)
}

fn local_name(raw: &[u8]) -> Result<String, DecodeError> {
    std::str::from_utf8(raw).map(str::to_string).map_err(xml_err)
}

fn is_inside_container(path: &[String]) -> bool {
    path.last().is_some_and(|parent| parent == CONTAINER)
}

fn finish_item(position: usize, item: ItemFields) -> Result<ExpenseItem, DecodeError> {
    ExpenseItem::from_fields(item.fields).map_err(|e| DecodeError::InvalidItem {
        index: position + 1,
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
