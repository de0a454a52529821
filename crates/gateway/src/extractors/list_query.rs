//! Query string extractor with repeated-key support.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;

use common::AppError;

/// Query string decoded with `serde_html_form`, so `a=1&a=2` fills a `Vec`.
pub struct ListQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ListQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        Ok(ListQuery(value))
    }
}
