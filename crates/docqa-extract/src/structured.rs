//! Structured sub-content extraction: key/value lines, bullet lists,
//! section headers.

/// Structured information pulled out of a cleaned chunk.
///
/// `key_values` preserves first-insertion order; a duplicate key
/// overwrites the earlier value in place (last write wins).
#[derive(Debug, Clone, Default)]
pub struct StructuredContent {
    pub lists: Vec<Vec<String>>,
    pub key_values: Vec<(String, String)>,
    pub sections: Vec<String>,
}

impl StructuredContent {
    pub fn value_for<'a>(&'a self, key: &str) -> Option<&'a str> {
        self.key_values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn upsert(&mut self, key: String, value: String) {
        if let Some(entry) = self.key_values.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.key_values.push((key, value));
        }
    }
}

const LIST_MARKERS: &[&str] = &["- ", "\u{2022} ", "* "];

/// Scan lines for key/value pairs, contiguous bullet runs and `###`
/// section headers. A bullet run is flushed to `lists` when broken by a
/// non-bullet line and again at end of input.
pub fn extract_structured_content(content: &str) -> StructuredContent {
    let mut structured = StructuredContent::default();
    let mut current_list: Vec<String> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();

        let list_marker = LIST_MARKERS.iter().find(|m| line.starts_with(*m));

        if line.contains(':') && list_marker.is_none() {
            if let Some((key_part, value_part)) = line.split_once(':') {
                let key = strip_emphasis(key_part);
                let value = strip_emphasis(value_part);
                if !key.is_empty() && !value.is_empty() {
                    structured.upsert(key, value);
                }
            }
        }

        if let Some(marker) = list_marker {
            current_list.push(line[marker.len()..].trim().to_string());
        } else if !current_list.is_empty() {
            structured.lists.push(std::mem::take(&mut current_list));
        }

        if line.starts_with("###") {
            structured.sections.push(line.replace('#', "").trim().to_string());
        }
    }

    if !current_list.is_empty() {
        structured.lists.push(current_list);
    }

    structured
}

fn strip_emphasis(s: &str) -> String {
    s.trim().replace("**", "").replace('*', "")
}
