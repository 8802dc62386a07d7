use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, multipart, Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::client::SectionGateway;
use super::errors::{GatewayError, GatewayResult};
use super::files::{FileDownload, FileKey, FileUpload};
use super::response::{DeleteResponse, SaveOutcome};
use super::target::{delete_segments, list_segments, SectionTarget};
use crate::config::GatewayConfig;
use crate::workflow::{EntityId, EntityKind};

/// [`SectionGateway`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: Client,
    bearer_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[String]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(GatewayError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn json(&self, request: RequestBuilder) -> GatewayResult<Value> {
        let response = self.send(request).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("Response is not JSON: {e}")))
    }
}

#[async_trait]
impl SectionGateway for HttpGateway {
    #[instrument(skip(self, body), fields(path = %target.edit_path()))]
    async fn submit_section(
        &self,
        target: &SectionTarget,
        body: &Value,
    ) -> GatewayResult<SaveOutcome> {
        let url = self.url(&target.edit_segments())?;
        let response = self.json(self.client.post(url).json(body)).await?;
        let outcome = SaveOutcome::from_response(&target.section, &response)?;
        debug!(clean = outcome.is_clean(), "Section submitted");
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn list_subresource(
        &self,
        kind: EntityKind,
        entity_id: EntityId,
        subresource: &str,
    ) -> GatewayResult<Vec<Value>> {
        let url = self.url(&list_segments(kind, entity_id, subresource))?;
        match self.json(self.client.get(url)).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(GatewayError::MalformedResponse(format!(
                "Expected an array of {subresource}, got {other}"
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn delete_subresource(
        &self,
        kind: EntityKind,
        subresource: &str,
        id: u64,
    ) -> GatewayResult<bool> {
        let url = self.url(&delete_segments(kind, subresource, id))?;
        let body = self.json(self.client.delete(url)).await?;
        let response: DeleteResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::MalformedResponse(format!("Invalid delete response: {e}")))?;
        Ok(response.success)
    }

    #[instrument(skip(self), fields(file_kind = %key.kind))]
    async fn download_file(&self, kind: EntityKind, key: &FileKey) -> GatewayResult<FileDownload> {
        let url = self.url(&key.segments(kind))?;
        let response = self.send(self.client.get(url)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(FileDownload {
            filename: key.download_filename(content_type.as_deref()),
            content_type,
            bytes,
        })
    }

    #[instrument(skip(self, file), fields(file_kind = %key.kind, filename = %file.filename))]
    async fn upload_file(
        &self,
        kind: EntityKind,
        key: &FileKey,
        file: FileUpload,
    ) -> GatewayResult<()> {
        let url = self.url(&key.segments(kind))?;
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .map_err(|e| GatewayError::Transport(format!("Invalid content type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        self.send(self.client.post(url).multipart(form)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FileKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, HttpGateway) {
        let server = MockServer::start().await;
        let config = GatewayConfig {
            base_url: server.uri(),
            timeout_ms: 5_000,
            bearer_token: Some("secret-token".to_string()),
        };
        let gateway = HttpGateway::new(&config).unwrap();
        (server, gateway)
    }

    #[tokio::test]
    async fn test_submit_section_posts_snapshot() {
        let (server, gateway) = setup().await;
        let body = json!({"vorname": "anna"});

        Mock::given(method("POST"))
            .and(path("/mitarbeiter/edit/42/stammdaten"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_json(&body))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"stammdaten": [{"vorname": "Anna"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let target = SectionTarget::new(EntityKind::Mitarbeiter, EntityId::new(42), "stammdaten");
        let outcome = gateway.submit_section(&target, &body).await.unwrap();

        let SaveOutcome::Clean(snapshot) = outcome else {
            panic!("expected clean outcome");
        };
        assert_eq!(snapshot.get_str("vorname"), Some("Anna"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (server, gateway) = setup().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("wartung"))
            .expect(1)
            .mount(&server)
            .await;

        let target = SectionTarget::new(EntityKind::Teilnehmer, EntityId::new(1), "stammdaten");
        let err = gateway.submit_section(&target, &json!({})).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Http {
                status: 503,
                body: "wartung".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_and_delete_subresources() {
        let (server, gateway) = setup().await;

        Mock::given(method("GET"))
            .and(path("/teilnehmer/7/teilnehmerNotiz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/teilnehmer/delete/teilnehmerNotiz/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let notes = gateway
            .list_subresource(EntityKind::Teilnehmer, EntityId::new(7), "teilnehmerNotiz")
            .await
            .unwrap();
        assert_eq!(notes.len(), 2);

        assert!(gateway
            .delete_subresource(EntityKind::Teilnehmer, "teilnehmerNotiz", 2)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_download_names_file_by_kind() {
        let (server, gateway) = setup().await;

        Mock::given(method("GET"))
            .and(path("/mitarbeiter/file/bankcard/10023/5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
            )
            .mount(&server)
            .await;

        let key = FileKey::new(FileKind::Bankcard, "10023", 5);
        let download = gateway
            .download_file(EntityKind::Mitarbeiter, &key)
            .await
            .unwrap();

        assert_eq!(download.filename, "10023_BANKCARD_5.png");
        assert_eq!(download.bytes.len(), 4);
    }

    #[tokio::test]
    async fn test_upload_posts_multipart() {
        let (server, gateway) = setup().await;

        Mock::given(method("POST"))
            .and(path("/mitarbeiter/file/ecard/10023/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let key = FileKey::new(FileKind::Ecard, "10023", 1);
        let upload = FileUpload {
            filename: "ecard.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        };
        gateway
            .upload_file(EntityKind::Mitarbeiter, &key, upload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 500,
            bearer_token: None,
        };
        let gateway = HttpGateway::new(&config).unwrap();
        let target = SectionTarget::new(EntityKind::Mitarbeiter, EntityId::new(1), "stammdaten");

        let err = gateway.submit_section(&target, &json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
