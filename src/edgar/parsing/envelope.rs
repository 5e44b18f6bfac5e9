use log::debug;

const XML_BLOCK_START: &str = "<XML>";
const XML_BLOCK_END: &str = "</XML>";
const XML_DECLARATION: &str = "<?xml";

/// Pulls the XML document out of a complete text submission.
///
/// Order matters: the first `<XML>...</XML>` block wins (trimmed to its
/// `<?xml` declaration when it has one); failing that, everything from the
/// first `<?xml` declaration in the whole text to the end.
pub fn extract_xml(submission: &str) -> Option<&str> {
    if let Some(xml) = xml_block(submission) {
        return Some(xml);
    }

    debug!("No usable <XML> block, looking for an <?xml ...?> declaration");
    submission
        .find(XML_DECLARATION)
        .map(|start| submission[start..].trim())
}

fn xml_block(submission: &str) -> Option<&str> {
    let start = submission.find(XML_BLOCK_START)? + XML_BLOCK_START.len();
    let Some(length) = submission[start..].find(XML_BLOCK_END) else {
        debug!("Found {} without a matching {}", XML_BLOCK_START, XML_BLOCK_END);
        return None;
    };

    let segment = &submission[start..start + length];
    let xml = match segment.find(XML_DECLARATION) {
        Some(declaration) => segment[declaration..].trim(),
        None => segment.trim(),
    };

    (!xml.is_empty()).then_some(xml)
}
