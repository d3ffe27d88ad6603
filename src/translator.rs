use crate::error::TranslationError;
use crate::languages;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`, given as a display name
    /// (`"french"`) or a code (`"fr"`).
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;
}

/// Client for the free Google Translate web endpoint. Unauthenticated; the
/// source language is always auto-detected.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let code = languages::code_for(target_language)
            .ok_or_else(|| TranslationError::UnsupportedLanguage(target_language.to_string()))?;
        if text.is_empty() {
            return Ok(String::new());
        }

        debug!(chars = text.chars().count(), language = code, "requesting translation");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", "auto"), ("tl", code), ("dt", "t"), ("q", text)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TranslationError::Service { status, body });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;
        parse_response(&json)
    }
}

/// Joins the translated segments of a `translate_a/single` response.
///
/// The payload looks like `[[["Bonjour ","Hello ",...],["le monde","world",...]],null,"en",...]`.
fn parse_response(json: &Value) -> Result<String, TranslationError> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::MalformedResponse("missing segment list".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(TranslationError::MalformedResponse("no translated text".into()));
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn translator() -> GoogleTranslator {
        // Discard port; nothing answers here.
        GoogleTranslator::new("http://127.0.0.1:9/translate", Duration::from_millis(200))
            .expect("client")
    }

    #[test]
    fn joins_segments() {
        let body = json!([
            [["Bonjour ", "Hello ", null, null, 10], ["le monde", "world", null, null, 10]],
            null,
            "en"
        ]);
        assert_eq!(parse_response(&body).unwrap(), "Bonjour le monde");
    }

    #[test]
    fn skips_transliteration_segments() {
        let body = json!([[["Привет", "Hello", null, null, 1], [null, null, "Privet"]], null, "en"]);
        assert_eq!(parse_response(&body).unwrap(), "Привет");
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(
            parse_response(&json!({"error": "nope"})),
            Err(TranslationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(&json!([[], null, "en"])),
            Err(TranslationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn unknown_language_fails_before_any_request() {
        let err = translator().translate("hello", "elvish").await.unwrap_err();
        assert!(matches!(err, TranslationError::UnsupportedLanguage(ref l) if l == "elvish"));
        assert_eq!(err.to_string(), "unsupported target language: elvish");
    }

    #[tokio::test]
    async fn empty_text_translates_to_empty_text() {
        let out = translator().translate("", "french").await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        let err = translator().translate("hello", "fr").await.unwrap_err();
        assert!(matches!(err, TranslationError::Request(_)));
    }

    async fn backend() -> (mockito::ServerGuard, GoogleTranslator) {
        let server = mockito::Server::new_async().await;
        let endpoint = format!("{}/translate_a/single", server.url());
        let translator = GoogleTranslator::new(endpoint, Duration::from_secs(5)).expect("client");
        (server, translator)
    }

    #[tokio::test]
    async fn sends_backend_code_and_joins_reply() {
        let (mut server, translator) = backend().await;
        let mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client".into(), "gtx".into()),
                Matcher::UrlEncoded("sl".into(), "auto".into()),
                Matcher::UrlEncoded("tl".into(), "fr".into()),
                Matcher::UrlEncoded("dt".into(), "t".into()),
                Matcher::UrlEncoded("q".into(), "hello world".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[[["Bonjour ","hello ",null,null,10],["le monde","world",null,null,10]],null,"en"]"#)
            .create_async()
            .await;

        let out = translator.translate("hello world", "French").await.unwrap();
        assert_eq!(out, "Bonjour le monde");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_a_service_error() {
        let (mut server, translator) = backend().await;
        let mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("try later")
            .create_async()
            .await;

        let err = translator.translate("hello", "german").await.unwrap_err();
        match &err {
            TranslationError::Service { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "try later");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "service returned 503: try later");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_reply_is_malformed() {
        let (mut server, translator) = backend().await;
        let mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>captcha</html>")
            .create_async()
            .await;

        let err = translator.translate("hello", "fr").await.unwrap_err();
        assert!(matches!(err, TranslationError::MalformedResponse(_)));
        mock.assert_async().await;
    }
}
