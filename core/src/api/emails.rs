//! Email assets.

use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::operation;
use crate::types::{ApiResponse, Record};

impl MarketoClient {
    /// Update an email's subject, sender or reply-to fields; the fields go
    /// in `options` (`subject`, `fromEmail`, `fromName`, `replyTo`).
    pub fn update_email_content(&self, email_id: i64, options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("id".into(), email_id.into());
        Command::new(&operation::UPDATE_EMAIL_CONTENT, params)
    }

    pub fn update_email_content_in_editable_section(
        &self,
        email_id: i64,
        html_id: &str,
        options: Params,
    ) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("id".into(), email_id.into());
        params.insert("htmlId".into(), html_id.into());
        Command::new(&operation::UPDATE_EMAIL_CONTENT_IN_EDITABLE_SECTION, params)
    }

    pub fn approve_email(&self, email_id: i64, options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("id".into(), email_id.into());
        Command::new(&operation::APPROVE_EMAIL, params)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::MarketoClient;
    use crate::command::Params;
    use crate::config::ClientConfig;
    use crate::error::MarketoError;

    fn client() -> MarketoClient {
        MarketoClient::new(ClientConfig::new("id", "secret").with_url("https://test.mktorest.com")).unwrap()
    }

    #[test]
    fn editable_section_path() {
        let c = client();
        let mut options = Params::new();
        options.insert("type".into(), "Text".into());
        options.insert("value".into(), "<p>Hi</p>".into());
        let req = c
            .prepare(&c.update_email_content_in_editable_section(1135, "lt-column", options), None)
            .unwrap();
        assert_eq!(
            req.url,
            "https://test.mktorest.com/rest/asset/v1/email/1135/content/lt-column.json"
        );
        assert_eq!(req.body_str(), Some(r#"{"type":"Text","value":"<p>Hi</p>"}"#));
    }

    #[test]
    fn empty_html_id_fails_at_prepare() {
        let c = client();
        let err = c
            .prepare(&c.update_email_content_in_editable_section(1135, "", Params::new()), None)
            .unwrap_err();
        assert!(matches!(err, MarketoError::InvalidArgument(_)));
    }

    #[test]
    fn approve_posts_without_body() {
        let c = client();
        let req = c.prepare(&c.approve_email(1135, Params::new()), None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/asset/v1/email/1135/approveDraft.json");
        assert!(req.body.is_none());
    }
}
