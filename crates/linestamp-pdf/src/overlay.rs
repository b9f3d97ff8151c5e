//! Line-number overlay compositing.
//!
//! Renders assigned numbers as a second content stream appended to the
//! page's /Contents, so the original content is never rewritten. The
//! stream is wrapped in q/Q and opens its own text object, so it cannot
//! inherit or leak graphics state.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use linestamp_core::LabeledLine;

use crate::error::StampError;
use crate::pipeline::StampOptions;

/// Resource key under which the overlay font is registered.
/// Suffixed with a counter if a page already uses the name.
const FONT_KEY: &str = "LSnum";

/// Stamp one page's labeled lines onto the page.
///
/// Each number is drawn at `options.x_position` and the line's
/// representative baseline, in `options.font_size` Helvetica. A page
/// with no labeled lines is left untouched.
pub fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    labels: &[LabeledLine],
    options: &StampOptions,
) -> Result<(), StampError> {
    if labels.is_empty() {
        return Ok(());
    }

    let font_key = free_font_key(doc, page_id);
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    add_font_resource(doc, page_id, &font_key, font_id)?;

    let content = overlay_stream(labels, &font_key, options);
    let stream_id = doc.add_object(Stream::new(dictionary! {}, content));
    append_to_contents(doc, page_id, stream_id)
}

/// Build the overlay content stream: one Tm/Tj pair per labeled line.
fn overlay_stream(labels: &[LabeledLine], font_key: &str, options: &StampOptions) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("q\nBT\n");
    out.push_str(&format!("/{font_key} {} Tf\n", options.font_size));
    for label in labels {
        out.push_str(&format!(
            "1 0 0 1 {} {} Tm ({}) Tj\n",
            options.x_position, label.y, label.number
        ));
    }
    out.push_str("ET\nQ");
    out.into_bytes()
}

/// Pick a /Font resource key the page does not already use.
fn free_font_key(doc: &Document, page_id: ObjectId) -> String {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    if !fonts.contains_key(FONT_KEY.as_bytes()) {
        return FONT_KEY.to_string();
    }
    let mut n = 0u32;
    loop {
        let candidate = format!("{FONT_KEY}{n}");
        if !fonts.contains_key(candidate.as_bytes()) {
            return candidate;
        }
        n += 1;
    }
}

/// Where a page's /Resources dictionary lives.
enum ResourcesLoc {
    /// /Resources is its own object, referenced from the page or an ancestor.
    Object(ObjectId),
    /// /Resources is an inline dictionary inside this (page or ancestor) dict.
    Inline(ObjectId),
}

/// Locate the /Resources dictionary for a page, walking up the page tree
/// (via /Parent) when the page does not carry its own.
fn find_resources(doc: &Document, page_id: ObjectId) -> Result<ResourcesLoc, StampError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| StampError::Render(format!("failed to get page dictionary: {e}")))?;

        match dict.get(b"Resources") {
            Ok(Object::Reference(id)) => return Ok(ResourcesLoc::Object(*id)),
            Ok(Object::Dictionary(_)) => return Ok(ResourcesLoc::Inline(current_id)),
            Ok(other) => {
                return Err(StampError::Render(format!(
                    "unexpected /Resources object: {other:?}"
                )));
            }
            Err(_) => match dict.get(b"Parent") {
                Ok(parent) => {
                    current_id = parent.as_reference().map_err(|e| {
                        StampError::Render(format!("invalid /Parent reference: {e}"))
                    })?;
                }
                // No resources anywhere in the tree: give the page its own.
                Err(_) => return Ok(ResourcesLoc::Inline(page_id)),
            },
        }
    }
}

/// Register `font_id` under `font_key` in the page's /Resources /Font
/// dictionary, creating missing dictionaries and following references.
fn add_font_resource(
    doc: &mut Document,
    page_id: ObjectId,
    font_key: &str,
    font_id: ObjectId,
) -> Result<(), StampError> {
    let loc = find_resources(doc, page_id)?;

    // /Font may itself be indirect; resolve before mutating.
    let font_dict_ref = {
        let resources = match &loc {
            ResourcesLoc::Object(id) => doc.get_object(*id).and_then(|o| o.as_dict()).ok(),
            ResourcesLoc::Inline(owner) => doc
                .get_object(*owner)
                .and_then(|o| o.as_dict())
                .ok()
                .and_then(|d| d.get(b"Resources").ok())
                .and_then(|o| o.as_dict().ok()),
        };
        match resources.and_then(|r| r.get(b"Font").ok()) {
            Some(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    if let Some(font_dict_id) = font_dict_ref {
        let fonts = doc
            .get_object_mut(font_dict_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| StampError::Render(format!("failed to get /Font dictionary: {e}")))?;
        fonts.set(font_key, Object::Reference(font_id));
        return Ok(());
    }

    let resources = match loc {
        ResourcesLoc::Object(id) => doc
            .get_object_mut(id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| StampError::Render(format!("failed to get /Resources: {e}")))?,
        ResourcesLoc::Inline(owner) => {
            let dict = doc
                .get_object_mut(owner)
                .and_then(|o| o.as_dict_mut())
                .map_err(|e| StampError::Render(format!("failed to get page dictionary: {e}")))?;
            if dict.get(b"Resources").is_err() {
                dict.set("Resources", lopdf::Dictionary::new());
            }
            match dict.get_mut(b"Resources") {
                Ok(Object::Dictionary(res)) => res,
                _ => {
                    return Err(StampError::Render(
                        "page /Resources is not a dictionary".to_string(),
                    ));
                }
            }
        }
    };

    if resources.get(b"Font").is_err() {
        resources.set("Font", lopdf::Dictionary::new());
    }
    match resources.get_mut(b"Font") {
        Ok(Object::Dictionary(fonts)) => {
            fonts.set(font_key, Object::Reference(font_id));
            Ok(())
        }
        _ => Err(StampError::Render(
            "page /Font resource is not a dictionary".to_string(),
        )),
    }
}

/// Append a stream to the page's /Contents, converting a lone reference
/// into an array so existing content stays first in paint order.
fn append_to_contents(
    doc: &mut Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<(), StampError> {
    let current = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| StampError::Render(format!("failed to get page dictionary: {e}")))?
        .get(b"Contents")
        .ok()
        .cloned();

    let new_contents = match current {
        Some(Object::Array(mut streams)) => {
            streams.push(Object::Reference(stream_id));
            Object::Array(streams)
        }
        Some(existing @ Object::Reference(_)) => {
            Object::Array(vec![existing, Object::Reference(stream_id)])
        }
        Some(other) => Object::Array(vec![other, Object::Reference(stream_id)]),
        None => Object::Reference(stream_id),
    };

    let page = doc
        .get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| StampError::Render(format!("failed to get page dictionary: {e}")))?;
    page.set("Contents", new_contents);
    Ok(())
}
