use std::borrow::Cow;

use nirs_core::{ControlError, NirsControlPlane};
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_control_err(err: ControlError) -> ErrorData {
    match err {
        ControlError::Source(err) => mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()),
    }
}

/// Runs a query on the blocking pool; queries read the filesystem inline.
pub async fn blocking<T, F>(control: &NirsControlPlane, query: F) -> Result<T, ErrorData>
where
    T: Send + 'static,
    F: FnOnce(&NirsControlPlane) -> Result<T, ControlError> + Send + 'static,
{
    let control = control.clone();
    tokio::task::spawn_blocking(move || query(&control))
        .await
        .map_err(|err| mcp_err(ErrorCode::INTERNAL_ERROR, format!("query task failed: {err}")))?
        .map_err(map_control_err)
}
