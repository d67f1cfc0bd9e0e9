//! Namespace-aware element lookup for the STS and OData responses

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// WS-Security secext namespace holding `BinarySecurityToken`
pub const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// OData dataservices namespace holding `FormDigestValue`
pub const DATASERVICES_NS: &str = "http://schemas.microsoft.com/ado/2007/08/dataservices";

/// Text of the first element named `local_name` in `namespace`
///
/// Returns `Ok(None)` when the element is absent or blank. The prefix used
/// in the document does not matter, only the namespace URI it resolves to.
pub fn element_text(
    xml: &str,
    namespace: &str,
    local_name: &str,
) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = NsReader::from_str(xml);
    let mut capturing = false;
    let mut text = String::new();

    loop {
        match reader.read_resolved_event()? {
            (ResolveResult::Bound(Namespace(ns)), Event::Start(e))
                if !capturing
                    && ns == namespace.as_bytes()
                    && e.local_name().as_ref() == local_name.as_bytes() =>
            {
                capturing = true;
            }
            (ResolveResult::Bound(Namespace(ns)), Event::Empty(e))
                if !capturing
                    && ns == namespace.as_bytes()
                    && e.local_name().as_ref() == local_name.as_bytes() =>
            {
                return Ok(None);
            }
            (_, Event::Text(t)) if capturing => text.push_str(&t.unescape()?),
            (_, Event::CData(c)) if capturing => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()))
            }
            (_, Event::End(_)) if capturing => break,
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    let text = text.trim();
    if !capturing || text.is_empty() {
        return Ok(None);
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<S:Envelope xmlns:S="http://www.w3.org/2003/05/soap-envelope" xmlns:wsse="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd" xmlns:wst="http://schemas.xmlsoap.org/ws/2005/02/trust">
  <S:Body>
    <wst:RequestSecurityTokenResponse>
      <wst:RequestedSecurityToken>
        <wsse:BinarySecurityToken Id="Compact0">t=EwBgAk6hB&amp;p=</wsse:BinarySecurityToken>
      </wst:RequestedSecurityToken>
    </wst:RequestSecurityTokenResponse>
  </S:Body>
</S:Envelope>"#;

    const DIGEST_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:GetContextWebInformation xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
  <d:FormDigestTimeoutSeconds m:type="Edm.Int32">1800</d:FormDigestTimeoutSeconds>
  <d:FormDigestValue>0x8F2A,15 Jan 2024 06:00:00 -0000</d:FormDigestValue>
</d:GetContextWebInformation>"#;

    #[test]
    fn test_finds_security_token() {
        let token = element_text(TOKEN_RESPONSE, WSSE_NS, "BinarySecurityToken").unwrap();
        assert_eq!(token.as_deref(), Some("t=EwBgAk6hB&p="));
    }

    #[test]
    fn test_finds_form_digest() {
        let digest = element_text(DIGEST_RESPONSE, DATASERVICES_NS, "FormDigestValue").unwrap();
        assert_eq!(digest.as_deref(), Some("0x8F2A,15 Jan 2024 06:00:00 -0000"));
    }

    #[test]
    fn test_prefix_is_irrelevant() {
        let xml = r#"<root xmlns:x="http://schemas.microsoft.com/ado/2007/08/dataservices"><x:FormDigestValue>abc</x:FormDigestValue></root>"#;
        let digest = element_text(xml, DATASERVICES_NS, "FormDigestValue").unwrap();
        assert_eq!(digest.as_deref(), Some("abc"));
    }

    #[test]
    fn test_wrong_namespace_is_absent() {
        let xml = r#"<root xmlns:x="urn:other"><x:FormDigestValue>abc</x:FormDigestValue></root>"#;
        assert_eq!(element_text(xml, DATASERVICES_NS, "FormDigestValue").unwrap(), None);
    }

    #[test]
    fn test_missing_and_blank_elements() {
        assert_eq!(element_text("<root/>", WSSE_NS, "BinarySecurityToken").unwrap(), None);

        let blank = format!(
            r#"<r xmlns:w="{WSSE_NS}"><w:BinarySecurityToken>  </w:BinarySecurityToken></r>"#
        );
        assert_eq!(element_text(&blank, WSSE_NS, "BinarySecurityToken").unwrap(), None);

        let empty = format!(r#"<r xmlns:w="{WSSE_NS}"><w:BinarySecurityToken/></r>"#);
        assert_eq!(element_text(&empty, WSSE_NS, "BinarySecurityToken").unwrap(), None);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let xml = r#"<root xmlns:w="urn:x"><w:a></w:b></root>"#;
        assert!(element_text(xml, "urn:x", "zzz").is_err());
    }
}
