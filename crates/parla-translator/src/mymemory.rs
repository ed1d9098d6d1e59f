use std::time::Duration;

use async_trait::async_trait;
use parla_types::primary_subtag;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

/// Client for the MyMemory `GET /get?q=..&langpair=xx|yy` endpoint
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    api_url: String,
    email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            email: None,
        }
    }

    /// Client whose transport gives up after `timeout`
    pub fn with_timeout(
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            email: None,
        })
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

/// Two-letter code the service expects for an internal tag
pub fn remote_code(tag: &str) -> String {
    primary_subtag(tag).to_ascii_lowercase()
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let langpair = format!("{}|{}", remote_code(&from), remote_code(&to));
        tracing::debug!("GET {} langpair={}", self.api_url, langpair);

        let mut params = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.email {
            params.push(("de", email.as_str()));
        }

        let response = self.client.get(&self.api_url).query(&params).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        // The service reports quota and pair errors inside a 200 body
        if let Some(status) = response_status(&json)
            && status != 200
        {
            if status == 429 {
                return Err(TranslateError::RateLimitExceeded);
            }
            let details = json["responseDetails"].as_str().unwrap_or("unknown error");
            return Err(TranslateError::ApiError(format!("{status}: {details}")));
        }

        let translated_text = json["responseData"]["translatedText"]
            .as_str()
            .ok_or(TranslateError::MissingField("responseData.translatedText"))?;

        if translated_text.trim().is_empty() {
            return Err(TranslateError::MalformedResponse(
                "empty translatedText".to_string(),
            ));
        }

        let match_quality = json["responseData"]["match"].as_f64().map(|m| m as f32);

        Ok(Translation {
            text: translated_text.to_string(),
            from,
            to,
            provider: "mymemory".to_string(),
            match_quality,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "MyMemory".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// `responseStatus` arrives as a number or a numeric string
fn response_status(json: &serde_json::Value) -> Option<u64> {
    let status = &json["responseStatus"];
    status
        .as_u64()
        .or_else(|| status.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn translator_for(server: &MockServer) -> MyMemoryTranslator {
        MyMemoryTranslator::new(format!("{}/get", server.uri()))
    }

    #[test]
    fn remote_code_uses_primary_subtag() {
        assert_eq!(remote_code("pt-BR"), "pt");
        assert_eq!(remote_code("en-US"), "en");
        assert_eq!(remote_code("ZH-cn"), "zh");
    }

    #[tokio::test]
    async fn sends_query_and_langpair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("q", "xyzzy-unmatched"))
            .and(query_param("langpair", "pt|en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": { "translatedText": "foo" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let translator = translator_for(&server);
        let translation = translator
            .translate("xyzzy-unmatched", "pt-BR".into(), "en-US".into())
            .await
            .unwrap();

        assert_eq!(translation.text, "foo");
        assert_eq!(translation.from, "pt-BR");
        assert_eq!(translation.to, "en-US");
        assert_eq!(translation.provider, "mymemory");
    }

    #[tokio::test]
    async fn sends_contact_email_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("de", "me@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": { "translatedText": "hello", "match": 0.85 },
                "responseStatus": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let translator = translator_for(&server)
            .with_email(Some("me@example.com".to_string()));
        let translation = translator
            .translate("olá", "pt-BR".into(), "en-US".into())
            .await
            .unwrap();

        assert_eq!(translation.text, "hello");
        assert_eq!(translation.match_quality, Some(0.85));
    }

    #[tokio::test]
    async fn missing_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": {}
            })))
            .mount(&server)
            .await;

        let err = translator_for(&server)
            .translate("abc", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::MissingField(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = translator_for(&server)
            .translate("abc", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_translation_is_not_a_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": { "translatedText": "  " }
            })))
            .mount(&server)
            .await;

        let err = translator_for(&server)
            .translate("abc", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn in_body_status_errors_surface() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": { "translatedText": "'XX' IS AN INVALID TARGET LANGUAGE" },
                "responseStatus": "403",
                "responseDetails": "'XX' IS AN INVALID TARGET LANGUAGE"
            })))
            .mount(&server)
            .await;

        let err = translator_for(&server)
            .translate("abc", "pt-BR".into(), "xx-YY".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::ApiError(ref msg) if msg.starts_with("403")));
    }

    #[tokio::test]
    async fn http_errors_are_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "limited"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let translator = translator_for(&server);

        let limited = translator
            .translate("limited", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();
        assert!(matches!(limited, TranslateError::RateLimitExceeded));

        let broken = translator
            .translate("broken", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();
        assert!(matches!(broken, TranslateError::ApiError(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn transport_timeout_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(serde_json::json!({
                        "responseData": { "translatedText": "late" }
                    })),
            )
            .mount(&server)
            .await;

        let translator = MyMemoryTranslator::with_timeout(
            format!("{}/get", server.uri()),
            Duration::from_millis(50),
        )
        .unwrap();

        let err = translator
            .translate("abc", "pt-BR".into(), "en-US".into())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::NetworkError(_)));
    }
}
