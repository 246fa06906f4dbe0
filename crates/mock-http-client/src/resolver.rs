//! Turn a matched rule into an outcome.

use crate::error::{ClientError, HttpStatusError};
use crate::request::RequestDescriptor;
use crate::response::Response;
use crate::rule::MockRule;

/// Statuses at or above this settle as [`ClientError::Status`].
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// Run the rule's producer and normalize its result.
///
/// Producer errors are passed through unchanged as [`ClientError::Producer`].
pub async fn resolve(rule: &MockRule, request: &RequestDescriptor) -> Result<Response, ClientError> {
    let spec = rule.produce(request).await.map_err(ClientError::Producer)?;
    let response = Response::from(spec);

    if response.status >= ERROR_STATUS_THRESHOLD {
        return Err(HttpStatusError::new(response).into());
    }
    Ok(response)
}
