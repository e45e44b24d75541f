use bitacora_core::BitacoraError;

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// This wraps `futures::future::join_all(tasks)` with `crate::core::with_request_deadline`.
/// On timeout the whole join resolves to `BitacoraError::RequestTimeout`.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, BitacoraError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(deadline, futures::future::join_all(tasks)).await
}

/// Collapse a set of source errors into a single `BitacoraError`.
///
/// Rules:
/// - No errors → `InvalidArg` (nothing was attempted).
/// - Exactly one error → that error, unchanged.
/// - Else → `AllSourcesFailed(errors)`.
pub fn collapse_errors(mut errors: Vec<BitacoraError>) -> BitacoraError {
    if errors.len() > 1 {
        return BitacoraError::AllSourcesFailed(errors);
    }
    errors
        .pop()
        .unwrap_or_else(|| BitacoraError::InvalidArg("no sources were attempted".to_string()))
}
