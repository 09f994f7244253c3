//! `GET /trivia`: one random record from a category.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;

use crate::app::AppContext;
use crate::dataset::{Dataset, TriviaCategory};
use crate::extension::{HandlerGroup, RouteError, RouteMarker, RouteTable};
use crate::http::{AppError, RequestOrigin};

/// Pointer to the record field holding a server-relative image path.
const IMAGE_POINTER: &str = "/specific/image";

pub struct Trivia {
    dataset: Arc<Dataset>,
}

#[derive(Debug, Default, Deserialize)]
struct TriviaParams {
    endpoint: Option<String>,
}

/// Requested category plus the origin the client used.
#[derive(Debug)]
pub struct TriviaRequest {
    category: Option<TriviaCategory>,
    origin: RequestOrigin,
}

impl<S: Send + Sync> FromRequestParts<S> for TriviaRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A query string that does not decode counts as no category at all.
        let Query(params) = Query::<TriviaParams>::try_from_uri(&parts.uri).unwrap_or_default();
        let category = params.endpoint.and_then(|name| name.parse().ok());
        let origin = RequestOrigin::from_request(&parts.uri, &parts.headers);

        Ok(Self { category, origin })
    }
}

type TriviaReply = Result<(StatusCode, Json<Value>), AppError>;

impl HandlerGroup for Trivia {
    const NAME: &'static str = "trivia";
    const TAG: &'static str = "Trivia";

    fn build(context: &AppContext) -> Self {
        Self {
            dataset: context.dataset(),
        }
    }

    fn routes(table: &mut RouteTable<Self>) -> Result<(), RouteError> {
        table.add(RouteMarker::get("trivia").path("/trivia"), Self::trivia)
    }
}

impl Trivia {
    async fn trivia(self: Arc<Self>, request: TriviaRequest) -> TriviaReply {
        let Some(category) = request.category else {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "endpoints": TriviaCategory::names() })),
            ));
        };

        let mut record = self
            .dataset
            .choose(category, &mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("no trivia records for `{category}`")))?;

        if !record.is_object() {
            return Err(AppError::Internal(format!(
                "trivia record in `{category}` is not an object"
            )));
        }
        absolutize_image(&mut record, &request.origin);

        Ok((StatusCode::OK, Json(record)))
    }
}

/// Rewrite `specific.image` from a server path to an absolute URL.
fn absolutize_image(record: &mut Value, origin: &RequestOrigin) {
    if let Some(image) = record.pointer_mut(IMAGE_POINTER) {
        if let Some(path) = image.as_str() {
            *image = Value::String(origin.absolute(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Uri};

    fn origin(uri: &str) -> RequestOrigin {
        RequestOrigin::from_request(&uri.parse::<Uri>().unwrap(), &HeaderMap::new())
    }

    #[test]
    fn test_image_is_rewritten_in_place() {
        let mut record = json!({
            "specific": {"image": "/assets/1.png", "kind": "silhouette"},
            "question": "Q?",
            "answer": "A"
        });
        absolutize_image(&mut record, &origin("https://example.com/trivia"));

        assert_eq!(
            record,
            json!({
                "specific": {"image": "https://example.com/assets/1.png", "kind": "silhouette"},
                "question": "Q?",
                "answer": "A"
            })
        );
    }

    #[test]
    fn test_records_without_image_are_untouched() {
        let mut record = json!({"question": "Q?", "specific": {"image": null}});
        let before = record.clone();
        absolutize_image(&mut record, &origin("http://localhost/trivia"));
        assert_eq!(record, before);
    }

    #[tokio::test]
    async fn test_request_parses_known_category_only() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("http://example.com/trivia?endpoint=gen2")
            .body(())
            .unwrap()
            .into_parts();
        let request = TriviaRequest::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(request.category, Some(TriviaCategory::Gen2));

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/trivia?endpoint=gen9")
            .body(())
            .unwrap()
            .into_parts();
        let request = TriviaRequest::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(request.category, None);
    }
}
