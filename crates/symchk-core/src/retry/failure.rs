//! What a failed GET against a mirror means for the lookup.

use crate::fetch::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// 404 or 410: the mirror does not carry this name.
    Missing,
    /// Any other non-2xx the mirror will keep giving (403, 400, stray 3xx).
    Refused(u32),
    /// 429 or 503.
    Throttled,
    /// Other 5xx.
    ServerError(u32),
    /// Timeouts, refused or reset connections, unresolvable host.
    Network,
    /// The transfer broke on our side: disk full, unwritable cache, curl setup.
    Local,
}

impl Failure {
    pub fn of(err: &FetchError) -> Self {
        match err {
            FetchError::Http(code) => Self::from_status(*code),
            FetchError::Curl(e) => Self::from_curl(e),
            FetchError::Storage(_) => Failure::Local,
        }
    }

    pub fn from_status(code: u32) -> Self {
        match code {
            404 | 410 => Failure::Missing,
            429 | 503 => Failure::Throttled,
            500..=599 => Failure::ServerError(code),
            other => Failure::Refused(other),
        }
    }

    fn from_curl(e: &curl::Error) -> Self {
        if e.is_operation_timedout()
            || e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
            || e.is_partial_file()
        {
            Failure::Network
        } else {
            Failure::Local
        }
    }

    /// Worth asking the same mirror for the same name again.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Failure::Throttled | Failure::ServerError(_) | Failure::Network
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn not_found_and_gone_are_answers() {
        assert_eq!(Failure::of(&FetchError::Http(404)), Failure::Missing);
        assert_eq!(Failure::of(&FetchError::Http(410)), Failure::Missing);
        assert!(!Failure::Missing.is_transient());
    }

    #[test]
    fn throttling_and_server_errors_are_transient() {
        assert_eq!(Failure::from_status(429), Failure::Throttled);
        assert_eq!(Failure::from_status(503), Failure::Throttled);
        assert_eq!(Failure::from_status(502), Failure::ServerError(502));
        assert!(Failure::from_status(503).is_transient());
        assert!(Failure::from_status(500).is_transient());
    }

    #[test]
    fn other_client_errors_are_final() {
        assert_eq!(Failure::from_status(403), Failure::Refused(403));
        assert!(!Failure::from_status(403).is_transient());
    }

    #[test]
    fn storage_is_local_and_final() {
        let e = FetchError::Storage(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(Failure::of(&e), Failure::Local);
        assert!(!Failure::Local.is_transient());
    }

    #[test]
    fn curl_timeout_is_network() {
        // CURLE_OPERATION_TIMEDOUT
        assert_eq!(Failure::of(&FetchError::Curl(curl::Error::new(28))), Failure::Network);
        // CURLE_URL_MALFORMAT
        assert_eq!(Failure::of(&FetchError::Curl(curl::Error::new(3))), Failure::Local);
    }
}
