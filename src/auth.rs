use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

pub const API_KEY_HEADER: &str = "x-api-key";
/// Sent as `X-Session-Id`; header names are case-insensitive on the wire.
pub const SESSION_ID_HEADER: &str = "x-session-id";

pub const AGENTS_PATH: &str = "/api/agents";
pub const ANONYMOUS_AGENTS_PATH: &str = "/api/agents/anonymous";

/// How requests are attributed. Fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Authenticated caller. A session id is only sent if one was supplied.
    ApiKey {
        api_key: String,
        session_id: Option<String>,
    },
    /// Anonymous caller identified by a session id.
    Anonymous { session_id: String },
}

impl AuthMode {
    /// An API key wins over a session id. Without either, a fresh UUID v4
    /// session id is generated. Empty strings count as absent.
    pub fn resolve(api_key: Option<String>, session_id: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.is_empty());
        let session_id = session_id.filter(|s| !s.is_empty());

        match (api_key, session_id) {
            (Some(api_key), session_id) => Self::ApiKey {
                api_key,
                session_id,
            },
            (None, Some(session_id)) => Self::Anonymous { session_id },
            (None, None) => Self::Anonymous {
                session_id: Uuid::new_v4().to_string(),
            },
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        match self {
            Self::ApiKey { api_key, .. } => Some(api_key),
            Self::Anonymous { .. } => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::ApiKey { session_id, .. } => session_id.as_deref(),
            Self::Anonymous { session_id } => Some(session_id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    /// Endpoint used to create agents in this mode.
    pub fn create_agent_path(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => AGENTS_PATH,
            Self::Anonymous { .. } => ANONYMOUS_AGENTS_PATH,
        }
    }

    /// Headers attached to every request made by the client.
    pub fn headers(&self) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = self.api_key() {
            let mut value = header_value(API_KEY_HEADER, api_key)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        if let Some(session_id) = self.session_id() {
            headers.insert(
                HeaderName::from_static(SESSION_ID_HEADER),
                header_value(SESSION_ID_HEADER, session_id)?,
            );
        }

        Ok(headers)
    }
}

fn header_value(name: &'static str, value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader { name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_uuid_session_without_credentials() {
        let first = AuthMode::resolve(None, None);
        let second = AuthMode::resolve(None, None);

        let id = first.session_id().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_ne!(first.session_id(), second.session_id());
        assert!(first.is_anonymous());
        assert_eq!(first.create_agent_path(), ANONYMOUS_AGENTS_PATH);
    }

    #[test]
    fn explicit_session_is_kept() {
        let auth = AuthMode::resolve(None, Some("sess-1".into()));
        assert_eq!(
            auth,
            AuthMode::Anonymous {
                session_id: "sess-1".into()
            }
        );
    }

    #[test]
    fn api_key_takes_precedence() {
        let auth = AuthMode::resolve(Some("k".into()), Some("sess-1".into()));
        assert_eq!(auth.api_key(), Some("k"));
        assert_eq!(auth.session_id(), Some("sess-1"));
        assert_eq!(auth.create_agent_path(), AGENTS_PATH);
    }

    #[test]
    fn api_key_alone_sends_no_session_header() {
        let headers = AuthMode::resolve(Some("k".into()), None).headers().unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "k");
        assert!(headers.get(SESSION_ID_HEADER).is_none());
        assert!(headers.get(API_KEY_HEADER).unwrap().is_sensitive());
    }

    #[test]
    fn both_credentials_send_both_headers() {
        let headers = AuthMode::resolve(Some("k".into()), Some("sess-1".into()))
            .headers()
            .unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "k");
        assert_eq!(headers.get("X-Session-Id").unwrap(), "sess-1");
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let auth = AuthMode::resolve(Some(String::new()), Some(String::new()));
        assert!(auth.is_anonymous());
        assert!(!auth.session_id().unwrap().is_empty());
    }

    #[test]
    fn rejects_unencodable_header_values() {
        let err = AuthMode::resolve(Some("bad\nkey".into()), None)
            .headers()
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidHeader {
                name: API_KEY_HEADER
            }
        ));
    }
}
