//! WS-Trust `RequestSecurityToken` envelope
//!
//! Built from explicit fields; every value is XML-escaped so credentials
//! cannot alter the document structure.

use quick_xml::escape::escape;

/// Fields of a SAML 1.0 token request to the Microsoft STS
#[derive(Clone, Copy)]
pub struct SecurityTokenRequest<'a> {
    /// STS endpoint the envelope is addressed to
    pub to: &'a str,
    /// Sign-in name
    pub username: &'a str,
    /// Password
    pub password: &'a str,
    /// Relying party (tenant URL) the token is issued for
    pub applies_to: &'a str,
}

impl<'a> SecurityTokenRequest<'a> {
    /// Render the SOAP 1.2 envelope
    pub fn to_xml(&self) -> String {
        format!(
            concat!(
                r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope" "#,
                r#"xmlns:a="http://www.w3.org/2005/08/addressing" "#,
                r#"xmlns:u="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd">"#,
                r#"<s:Header>"#,
                r#"<a:Action s:mustUnderstand="1">http://schemas.xmlsoap.org/ws/2005/02/trust/RST/Issue</a:Action>"#,
                r#"<a:ReplyTo><a:Address>http://www.w3.org/2005/08/addressing/anonymous</a:Address></a:ReplyTo>"#,
                r#"<a:To s:mustUnderstand="1">{to}</a:To>"#,
                r#"<o:Security s:mustUnderstand="1" "#,
                r#"xmlns:o="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd">"#,
                r#"<o:UsernameToken><o:Username>{username}</o:Username><o:Password>{password}</o:Password></o:UsernameToken>"#,
                r#"</o:Security>"#,
                r#"</s:Header>"#,
                r#"<s:Body>"#,
                r#"<t:RequestSecurityToken xmlns:t="http://schemas.xmlsoap.org/ws/2005/02/trust">"#,
                r#"<wsp:AppliesTo xmlns:wsp="http://schemas.xmlsoap.org/ws/2004/09/policy">"#,
                r#"<a:EndpointReference><a:Address>{applies_to}</a:Address></a:EndpointReference>"#,
                r#"</wsp:AppliesTo>"#,
                r#"<t:KeyType>http://schemas.xmlsoap.org/ws/2005/05/identity/NoProofKey</t:KeyType>"#,
                r#"<t:RequestType>http://schemas.xmlsoap.org/ws/2005/02/trust/Issue</t:RequestType>"#,
                r#"<t:TokenType>urn:oasis:names:tc:SAML:1.0:assertion</t:TokenType>"#,
                r#"</t:RequestSecurityToken>"#,
                r#"</s:Body>"#,
                r#"</s:Envelope>"#,
            ),
            to = escape(self.to),
            username = escape(self.username),
            password = escape(self.password),
            applies_to = escape(self.applies_to),
        )
    }
}

impl std::fmt::Debug for SecurityTokenRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityTokenRequest")
            .field("to", &self.to)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("applies_to", &self.applies_to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sharepoint::xml::element_text;

    const WSSE: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
    const ADDRESSING: &str = "http://www.w3.org/2005/08/addressing";

    fn request<'a>(username: &'a str, password: &'a str) -> SecurityTokenRequest<'a> {
        SecurityTokenRequest {
            to: "https://login.microsoftonline.com/extSTS.srf",
            username,
            password,
            applies_to: "https://contoso.sharepoint.com",
        }
    }

    #[test]
    fn test_envelope_carries_fields() {
        let xml = request("svc@contoso.com", "pw").to_xml();
        assert_eq!(element_text(&xml, WSSE, "Username").unwrap().as_deref(), Some("svc@contoso.com"));
        assert_eq!(element_text(&xml, WSSE, "Password").unwrap().as_deref(), Some("pw"));
        assert_eq!(
            element_text(&xml, ADDRESSING, "To").unwrap().as_deref(),
            Some("https://login.microsoftonline.com/extSTS.srf")
        );
        assert!(xml.contains("<a:Address>https://contoso.sharepoint.com</a:Address>"));
    }

    #[test]
    fn test_envelope_escapes_markup() {
        let password = "p<a>ss&</o:Password><o:Injected/>\"'";
        let xml = request("svc@contoso.com", password).to_xml();
        assert!(!xml.contains("<o:Injected/>"));
        assert_eq!(element_text(&xml, WSSE, "Password").unwrap().as_deref(), Some(password));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", request("svc@contoso.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("svc@contoso.com"));
    }
}
