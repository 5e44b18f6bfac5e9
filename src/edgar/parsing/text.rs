use chardet::detect;
use encoding_rs::{Encoding, WINDOWS_1252};
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::io::Read;
use std::path::Path;

/// Reads a filing as text. Non UTF-8 submissions are transcoded from their
/// detected charset.
pub fn read_filing_text(path: &Path) -> std::io::Result<String> {
    decode_filing_bytes(std::fs::read(path)?)
}

pub fn decode_filing_bytes(raw: Vec<u8>) -> std::io::Result<String> {
    let raw = match String::from_utf8(raw) {
        Ok(text) => {
            return Ok(match text.strip_prefix('\u{feff}') {
                Some(stripped) => stripped.to_string(),
                None => text,
            })
        }
        Err(e) => e.into_bytes(),
    };

    let charenc = detect(&raw).0;
    log::debug!("Detected character encoding: {}", charenc);

    let encoding = Encoding::for_label(charenc.as_bytes()).unwrap_or(WINDOWS_1252);
    let mut reader = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(raw.as_slice());

    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passes_through() {
        let text = decode_filing_bytes("<name>SOCIÉTÉ GÉNÉRALE</name>".as_bytes().to_vec()).unwrap();
        assert_eq!(text, "<name>SOCIÉTÉ GÉNÉRALE</name>");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut raw = vec![0xEF, 0xBB, 0xBF];
        raw.extend_from_slice(b"<?xml version=\"1.0\"?><a/>");
        let text = decode_filing_bytes(raw).unwrap();
        assert!(text.starts_with("<?xml"));
    }

    #[test]
    fn test_invalid_utf8_is_transcoded() {
        let mut raw = b"<edgarSubmission><regName>Caf".to_vec();
        raw.push(0xE9);
        raw.extend_from_slice(b" Fund Trust</regName></edgarSubmission>");
        let text = decode_filing_bytes(raw).unwrap();
        assert!(text.starts_with("<edgarSubmission><regName>Caf"));
        assert!(text.ends_with(" Fund Trust</regName></edgarSubmission>"));
    }
}
