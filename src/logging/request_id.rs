//! Request ID generation

use uuid::Uuid;

/// Generate a new request ID using UUID v4
///
/// Every request client call is tagged with one so that the start, outcome
/// and any fallback of a call can be correlated in the logs.
///
/// # Examples
///
/// ```
/// use finkube::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_id_format() {
        let id = generate_request_id();
        // UUID v4 format: xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|&c| c == '-').count(), 4);
    }

    #[test]
    fn test_generate_request_id_uniqueness() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
