use crate::PressError;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Copies objects between documents, remapping every reference to a
/// fresh id in the target.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self { source, target, id_map: HashMap::new() }
    }

    /// Deep-copies `source_id` and everything it references. The new
    /// id is registered in the map before recursing, which breaks the
    /// Page -> Parent -> Kids -> Page cycle every page tree contains.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Placeholder first, content after the recursion completes.
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;

        match self.target.objects.get_mut(&new_id) {
            Some(slot) => *slot = new_obj,
            None => return Err(lopdf::Error::ObjectNotFound(new_id)),
        }
        Ok(new_id)
    }

    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => {
                let arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(arr))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }
}

/// Appends the pages of `source` to `target` by structural copy:
/// page dictionaries and their dependencies (content streams, fonts,
/// resources) move over with fresh ids, nothing is re-rendered.
pub fn merge_documents(target: &mut Document, source: Document) -> Result<(), PressError> {
    let source_pages = source.get_pages();
    if source_pages.is_empty() {
        return Ok(());
    }

    let mut copier = ObjectCopier::new(&source, target);
    let mut new_page_refs = Vec::new();
    let mut copied_page_ids = Vec::new();

    let mut ordered: Vec<_> = source_pages.into_iter().collect();
    ordered.sort_by_key(|(page_num, _)| *page_num);

    for (_, page_id) in ordered {
        let new_page_id = copier.copy_object(page_id)?;
        new_page_refs.push(Object::Reference(new_page_id));
        copied_page_ids.push(new_page_id);
    }
    let added = new_page_refs.len() as i64;

    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let root_dict = target.get_object_mut(root_id)?.as_dict_mut()?;
    let pages_id = root_dict.get(b"Pages")?.as_reference()?;
    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;

    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let original_count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(new_page_refs);
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", original_count + added);

    // Copied pages still point at the source page tree.
    for page_id in copied_page_ids {
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}

/// Merges whole PDF byte buffers into one document, pages in input
/// order. An unparsable input is an input error and aborts the merge.
pub fn merge_pdfs(inputs: &[Vec<u8>]) -> Result<Vec<u8>, PressError> {
    let mut iter = inputs.iter();
    let first = iter.next().ok_or(PressError::NothingToMerge)?;
    let mut target = Document::load_mem(first)?;

    for input in iter {
        let source = Document::load_mem(input)?;
        merge_documents(&mut target, source)?;
    }

    let mut out = Vec::new();
    target.save_to(&mut out)?;
    Ok(out)
}

/// Appends `content_stream` to a page's content array so it draws on
/// top of the existing content, which itself is never touched.
pub fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content_stream: Vec<u8>,
) -> Result<(), PressError> {
    let stream = Stream::new(dictionary! {}, content_stream);
    let new_content_id = doc.add_object(Object::Stream(stream));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page_dict.get_mut(b"Contents") {
        Ok(contents_obj) => {
            let mut contents = match contents_obj.as_array() {
                Ok(arr) => arr.clone(),
                // A single stream reference; wrap it.
                Err(_) => vec![contents_obj.clone()],
            };
            contents.push(Object::Reference(new_content_id));
            page_dict.set("Contents", Object::Array(contents));
        }
        Err(_) => {
            page_dict.set("Contents", Object::Reference(new_content_id));
        }
    }
    Ok(())
}

/// Number of pages in a serialized PDF.
pub fn page_count(bytes: &[u8]) -> Result<usize, PressError> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::StringFormat;

    /// A minimal n-page document with "<prefix> <n>" drawn on each
    /// page, 100mm x 50mm.
    pub(crate) fn sample_pdf(num_pages: u32, text_prefix: &str) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![20.into(), 100.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{} {}", text_prefix, i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(283.46),
                    Object::Real(141.73),
                ],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
        };
        doc.objects.insert(pages_id, pages_dict.into());

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    pub(crate) fn sample_pdf_bytes(num_pages: u32, text_prefix: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        sample_pdf(num_pages, text_prefix).save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn merge_appends_pages_in_order() {
        let mut target = sample_pdf(2, "Target");
        let source = sample_pdf(3, "Source");

        merge_documents(&mut target, source).unwrap();

        assert_eq!(target.get_pages().len(), 5);
        let pages = target.get_pages();
        let page_3 = target.get_page_content(*pages.get(&3).unwrap()).unwrap();
        assert!(String::from_utf8_lossy(&page_3).contains("Source 1"));
        let page_1 = target.get_page_content(*pages.get(&1).unwrap()).unwrap();
        assert!(String::from_utf8_lossy(&page_1).contains("Target 1"));
    }

    #[test]
    fn merge_pdfs_concatenates_byte_buffers() {
        let merged = merge_pdfs(&[
            sample_pdf_bytes(1, "A"),
            sample_pdf_bytes(2, "B"),
            sample_pdf_bytes(1, "C"),
        ])
        .unwrap();
        assert_eq!(page_count(&merged).unwrap(), 4);
    }

    #[test]
    fn merge_pdfs_rejects_empty_input() {
        assert!(matches!(merge_pdfs(&[]), Err(PressError::NothingToMerge)));
    }

    #[test]
    fn merge_pdfs_rejects_garbage_input() {
        assert!(merge_pdfs(&[b"not a pdf".to_vec()]).is_err());
    }

    #[test]
    fn overlay_appends_a_second_content_stream() {
        let mut doc = sample_pdf(1, "Original");
        let page_id = *doc.get_pages().get(&1).unwrap();

        let overlay = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![20.into(), 20.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(b"Overlay".to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()
        .unwrap();

        overlay_content(&mut doc, page_id, overlay).unwrap();

        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let contents = page_dict.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 2);

        let full = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&full);
        assert!(text.contains("Original"));
        assert!(text.contains("Overlay"));
    }
}
