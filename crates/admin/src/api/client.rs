//! Typed GraphQL execution against the platform API.

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use secrecy::SecretString;
use tracing::instrument;

use crate::config::ApiConfig;

use super::{ApiError, GraphQLError, GraphQLErrorLocation, GraphQLTransport, HttpTransport};

/// Platform API client.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn GraphQLTransport>,
}

impl ApiClient {
    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self { transport }
    }

    /// Create a client over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn http(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Execute a GraphQL operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the response contains
    /// GraphQL errors, or the data does not match the operation's shape.
    #[instrument(skip_all, fields(operation = tracing::field::Empty))]
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        token: Option<&SecretString>,
    ) -> Result<Q::ResponseData, ApiError> {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;
        tracing::Span::current().record("operation", operation);

        let body = serde_json::to_value(&request_body)?;
        let raw = self.transport.send(&body, token).await?;

        let response: Response<Q::ResponseData> = serde_json::from_value(raw).map_err(|e| {
            tracing::error!(error = %e, operation, "Response does not match operation shape");
            ApiError::Parse(e)
        })?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, operation, "GraphQL errors in response");

            return Err(ApiError::GraphQL(
                errors.into_iter().map(convert_error).collect(),
            ));
        }

        response.data.ok_or(ApiError::NoData(operation))
    }
}

fn convert_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => {
                        serde_json::Value::Number(i.into())
                    }
                })
                .collect()
        }),
        code: error
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use yumbox_core::PromocodeId;

    use super::*;
    use crate::api::inputs::UniqueArgs;
    use crate::api::operations::FindUniquePromocode;

    /// Replies with a fixed envelope and remembers the last request body.
    struct FixedTransport {
        reply: serde_json::Value,
        last_body: Mutex<Option<serde_json::Value>>,
    }

    impl FixedTransport {
        fn new(reply: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                reply,
                last_body: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl GraphQLTransport for FixedTransport {
        async fn send(
            &self,
            body: &serde_json::Value,
            _token: Option<&SecretString>,
        ) -> Result<serde_json::Value, ApiError> {
            *self.last_body.lock().unwrap() = Some(body.clone());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_execute_sends_operation_name_and_variables() {
        let transport = FixedTransport::new(json!({"data": {"findUniquePromocode": null}}));
        let client = ApiClient::new(transport.clone());

        let result = client
            .execute::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(4)), None)
            .await
            .unwrap();
        assert!(result.into_inner().is_none());

        let body = transport.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["operationName"], "FindUniquePromocode");
        assert_eq!(body["variables"], json!({"where": {"id": 4}}));
        assert!(
            body["query"]
                .as_str()
                .unwrap()
                .contains("query FindUniquePromocode")
        );
    }

    #[tokio::test]
    async fn test_execute_surfaces_graphql_errors() {
        let transport = FixedTransport::new(json!({
            "data": null,
            "errors": [{
                "message": "Record to delete does not exist.",
                "path": ["deleteOnePromocode"]
            }]
        }));
        let client = ApiClient::new(transport);

        let err = client
            .execute::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(1)), None)
            .await
            .unwrap_err();

        match err {
            ApiError::GraphQL(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].message, "Record to delete does not exist.");
                assert_eq!(errors[0].path, vec![json!("deleteOnePromocode")]);
            }
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_keeps_error_code() {
        let transport = FixedTransport::new(json!({
            "data": null,
            "errors": [{
                "message": "Invalid login or password",
                "extensions": {"code": "UNAUTHENTICATED"}
            }]
        }));
        let client = ApiClient::new(transport);

        let err = client
            .execute::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(1)), None)
            .await
            .unwrap_err();

        let ApiError::GraphQL(errors) = err else {
            panic!("expected GraphQL error, got {err:?}");
        };
        assert_eq!(errors[0].code.as_deref(), Some("UNAUTHENTICATED"));
        assert!(errors[0].is_auth_failure());
    }

    #[tokio::test]
    async fn test_execute_without_data_is_an_error() {
        let client = ApiClient::new(FixedTransport::new(json!({"data": null})));

        let err = client
            .execute::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoData("FindUniquePromocode")));
    }

    #[tokio::test]
    async fn test_execute_rejects_mismatched_shape() {
        let client = ApiClient::new(FixedTransport::new(json!({
            "data": {"findUniquePromocode": {"id": "not-a-number"}}
        })));

        let err = client
            .execute::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
