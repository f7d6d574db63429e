//! Request extractors whose rejections answer with an envelope.
//!
//! Axum's own `Json`, `Query`, `Path` and `Multipart` reject with plain text.
//! The wrappers here run them unchanged and turn the rejection into a
//! [`Reply`], so a malformed request reads like any other failed action.

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

use account::ActionError;
use axum::extract::{FromRequest, FromRequestParts, Json, Multipart, Path, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Reply;

/// Action error for a request axum refused to parse. An oversized body is an
/// upload failure; anything else the caller sent wrong fails validation.
pub(crate) fn rejection_error(status: StatusCode, body: &str) -> ActionError {
    tracing::debug!(%status, reason = body, "request rejected");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ActionError::upload(format!("이미지 업로드 실패: {body}"))
    } else {
        ActionError::validation(body)
    }
}

fn reject(status: StatusCode, body: &str) -> Reply<()> {
    Reply(Err(rejection_error(status, body)))
}

/// `Json<T>` with an envelope rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Reply<()>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(e) => Err(reject(e.status(), &e.body_text())),
        }
    }
}

/// `Query<T>` with an envelope rejection.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Reply<()>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(e) => Err(reject(e.status(), &e.body_text())),
        }
    }
}

/// `Path<T>` with an envelope rejection.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Reply<()>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(e) => Err(reject(e.status(), &e.body_text())),
        }
    }
}

/// `Multipart` with an envelope rejection. Errors while reading fields are
/// mapped by the handler.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = Reply<()>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|e| reject(e.status(), &e.body_text()))
    }
}
