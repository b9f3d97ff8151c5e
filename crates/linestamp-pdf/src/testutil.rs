//! In-memory PDF fixtures for unit tests.

use lopdf::{Object, Stream, dictionary};

/// Build a single-page PDF with the given content stream.
pub(crate) fn single_page_pdf(content: &[u8]) -> Vec<u8> {
    multi_page_pdf(&[content])
}

/// Build a PDF with one page per content stream, all sharing a
/// Helvetica /F1 font resource and a US Letter MediaBox.
pub(crate) fn multi_page_pdf(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.to_vec());
        let content_id = doc.add_object(stream);

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    };
    let pages_id = doc.add_object(pages_dict);

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Concatenated, decompressed content of every stream referenced by a
/// page's /Contents.
pub(crate) fn page_content_text(doc: &lopdf::Document, page_number: u32) -> String {
    let page_id = *doc.get_pages().get(&page_number).unwrap();
    let data = doc.get_page_content(page_id).unwrap();
    String::from_utf8_lossy(&data).into_owned()
}
