//! Wallpaper payload extraction from the primary image's XMP block.
//!
//! Apple-style dynamic wallpapers attach a single XMP (RDF/XML) block to the
//! primary image. Exactly one `rdf:Description` element carries the payload
//! in one of two attributes:
//!
//! ```xml
//! <rdf:Description rdf:about=""
//!     xmlns:apple_desktop="http://ns.apple.com/namespace/1.0/"
//!     apple_desktop:solar="YnBsaXN0MDDRAQJS..."/>
//! ```
//!
//! | Attribute | Scheme |
//! |---|---|
//! | `apple_desktop:solar` | sun positions |
//! | `apple_desktop:h24` | time of day |
//!
//! The attribute value is base64; the decoded bytes are a property list that
//! is handed untouched to [`super::metadata`].

use crate::importer::ImportError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

const DESCRIPTION_TAG: &[u8] = b"rdf:Description";
const SOLAR_ATTRIBUTE: &[u8] = b"apple_desktop:solar";
const TIMED_ATTRIBUTE: &[u8] = b"apple_desktop:h24";

/// Pick the single metadata block and return its decoded plist payload.
///
/// Zero blocks, or more than one (ambiguous), is [`ImportError::NoMetadataBlock`].
pub fn extract_payload(blocks: &[Vec<u8>]) -> Result<Vec<u8>, ImportError> {
    match blocks {
        [block] => payload_from_xmp(block),
        _ => Err(ImportError::NoMetadataBlock(blocks.len())),
    }
}

/// Decode the wallpaper payload from one XMP document.
pub fn payload_from_xmp(xmp: &[u8]) -> Result<Vec<u8>, ImportError> {
    let mut reader = Reader::from_reader(xmp);
    let mut buf = Vec::new();
    let mut descriptions = 0usize;
    let mut encoded = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) | Ok(Event::Empty(element))
                if element.name().as_ref() == DESCRIPTION_TAG =>
            {
                descriptions += 1;
                if descriptions == 1 {
                    encoded = payload_attribute(&element)?;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ImportError::MalformedMetadata(format!(
                    "XMP parse error at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
        buf.clear();
    }

    if descriptions != 1 {
        return Err(ImportError::MalformedMetadata(format!(
            "expected one rdf:Description element, found {descriptions}"
        )));
    }
    let encoded = encoded.ok_or_else(|| {
        ImportError::MalformedMetadata("rdf:Description has no apple_desktop payload".into())
    })?;

    decode_base64(&encoded)
}

/// Value of whichever payload attribute is present. Both at once is ambiguous.
fn payload_attribute(element: &BytesStart<'_>) -> Result<Option<Vec<u8>>, ImportError> {
    let mut solar = None;
    let mut timed = None;

    for attribute in element.attributes() {
        let attribute = attribute
            .map_err(|e| ImportError::MalformedMetadata(format!("bad XMP attribute: {e}")))?;
        match attribute.key.as_ref() {
            SOLAR_ATTRIBUTE => solar = Some(attribute.value.into_owned()),
            TIMED_ATTRIBUTE => timed = Some(attribute.value.into_owned()),
            _ => {}
        }
    }

    match (solar, timed) {
        (Some(_), Some(_)) => Err(ImportError::MalformedMetadata(
            "both apple_desktop:solar and apple_desktop:h24 are present".into(),
        )),
        (Some(value), None) => {
            debug!("found solar payload attribute");
            Ok(Some(value))
        }
        (None, Some(value)) => {
            debug!("found h24 payload attribute");
            Ok(Some(value))
        }
        (None, None) => Ok(None),
    }
}

fn decode_base64(encoded: &[u8]) -> Result<Vec<u8>, ImportError> {
    let compact: Vec<u8> = encoded
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(ImportError::MalformedMetadata(
            "apple_desktop payload is empty".into(),
        ));
    }
    STANDARD
        .decode(&compact)
        .map_err(|e| ImportError::MalformedMetadata(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::xmp_block;

    #[test]
    fn decodes_solar_attribute() {
        let block = xmp_block("apple_desktop:solar", b"solar-bytes");
        assert_eq!(payload_from_xmp(&block).unwrap(), b"solar-bytes");
    }

    #[test]
    fn decodes_h24_attribute() {
        let block = xmp_block("apple_desktop:h24", b"\x00\x01timed");
        assert_eq!(payload_from_xmp(&block).unwrap(), b"\x00\x01timed");
    }

    #[test]
    fn tolerates_wrapped_base64() {
        let block = br#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description rdf:about=""
  xmlns:apple_desktop="http://ns.apple.com/namespace/1.0/"
  apple_desktop:h24="aGVs
bG8="/></rdf:RDF></x:xmpmeta>"#;
        assert_eq!(payload_from_xmp(block).unwrap(), b"hello");
    }

    #[test]
    fn requires_exactly_one_block() {
        assert!(matches!(
            extract_payload(&[]),
            Err(ImportError::NoMetadataBlock(0))
        ));

        let block = xmp_block("apple_desktop:solar", b"x");
        assert!(matches!(
            extract_payload(&[block.clone(), block]),
            Err(ImportError::NoMetadataBlock(2))
        ));
    }

    #[test]
    fn rejects_missing_description() {
        let block = br#"<x:xmpmeta xmlns:x="adobe:ns:meta/"></x:xmpmeta>"#;
        let err = payload_from_xmp(block).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMetadata(msg) if msg.contains("found 0")));
    }

    #[test]
    fn rejects_two_descriptions() {
        let block = br#"<rdf:RDF xmlns:rdf="r">
<rdf:Description apple_desktop:solar="eA=="/>
<rdf:Description apple_desktop:solar="eA=="/>
</rdf:RDF>"#;
        let err = payload_from_xmp(block).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMetadata(msg) if msg.contains("found 2")));
    }

    #[test]
    fn rejects_description_without_payload() {
        let block = br#"<rdf:RDF><rdf:Description rdf:about=""/></rdf:RDF>"#;
        assert!(matches!(
            payload_from_xmp(block),
            Err(ImportError::MalformedMetadata(_))
        ));
    }

    #[test]
    fn rejects_both_payload_attributes() {
        let block =
            br#"<rdf:RDF>
<rdf:Description apple_desktop:solar="eA==" apple_desktop:h24="eA=="/>
</rdf:RDF>"#;
        let err = payload_from_xmp(block).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMetadata(msg) if msg.contains("both")));
    }

    #[test]
    fn rejects_invalid_base64() {
        let block = br#"<rdf:RDF><rdf:Description apple_desktop:h24="not base64!"/></rdf:RDF>"#;
        let err = payload_from_xmp(block).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMetadata(msg) if msg.contains("base64")));
    }

    #[test]
    fn rejects_broken_xml() {
        let block = b"<rdf:RDF><rdf:Description apple_desktop:h24=\"eA==\"></rdf:RDF>";
        assert!(matches!(
            payload_from_xmp(block),
            Err(ImportError::MalformedMetadata(_))
        ));
    }
}
