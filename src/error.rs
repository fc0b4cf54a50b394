use thiserror::Error;

/// Normalized error for every backend call. Non-2xx responses become
/// `Http` with a parsed domain code; transport problems stay `Network`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend temporarily unavailable (circuit open)")]
    CircuitOpen,

    #[error("backend returned {status}: {message}")]
    Http {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            ApiError::Http { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_seat_conflict(&self) -> bool {
        matches!(self.code(), Some(ErrorCode::SeatAlreadyTaken { .. }))
    }

    pub fn is_quote_expired(&self) -> bool {
        matches!(self.code(), Some(ErrorCode::QuoteExpired))
    }

    pub fn is_quote_not_found(&self) -> bool {
        matches!(self.code(), Some(ErrorCode::QuoteNotFound))
    }
}

/// Domain error codes carried in backend error bodies. Parsed from the
/// structured `code`/`seat` fields when present; substring matching of the
/// human-readable message is a legacy fallback only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    SeatAlreadyTaken { seat_id: String },
    QuoteExpired,
    QuoteNotFound,
    Validation,
    Unknown,
}

impl ErrorCode {
    pub fn parse(code: Option<&str>, seat: Option<String>, message: &str) -> Self {
        match code {
            Some("SEAT_ALREADY_TAKEN") => ErrorCode::SeatAlreadyTaken {
                seat_id: seat
                    .or_else(|| extract_seat_id(message))
                    .unwrap_or_default(),
            },
            Some("QUOTE_EXPIRED") => ErrorCode::QuoteExpired,
            Some("QUOTE_NOT_FOUND") => ErrorCode::QuoteNotFound,
            Some("VALIDATION_ERROR") => ErrorCode::Validation,
            Some(_) => ErrorCode::Unknown,
            // Legacy backends send only a message.
            None => Self::from_message(message),
        }
    }

    fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("already taken") || lower.contains("seat conflict") {
            ErrorCode::SeatAlreadyTaken {
                seat_id: extract_seat_id(message).unwrap_or_default(),
            }
        } else if lower.contains("quote") && lower.contains("expired") {
            ErrorCode::QuoteExpired
        } else if lower.contains("quote") && lower.contains("not found") {
            ErrorCode::QuoteNotFound
        } else {
            ErrorCode::Unknown
        }
    }
}

// Legacy extraction of a seat identifier ("Seat R5C12 is already taken")
fn extract_seat_id(message: &str) -> Option<String> {
    message
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == ':')
        .find(|token| is_seat_id(token))
        .map(str::to_string)
}

fn is_seat_id(token: &str) -> bool {
    let rest = match token.strip_prefix('R') {
        Some(rest) => rest,
        None => return false,
    };
    let (row, col) = match rest.split_once('C') {
        Some(parts) => parts,
        None => return false,
    };
    !row.is_empty()
        && !col.is_empty()
        && row.chars().all(|c| c.is_ascii_digit())
        && col.chars().all(|c| c.is_ascii_digit())
}

/// Which earlier step the user can safely be sent back to when a flow hits
/// an irrecoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeStep {
    OccurrenceList,
    SeatSelection,
    Checkout,
}

/// Flow-level failures above the API layer.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("at most {limit} seats per order")]
    SeatLimitReached { limit: usize },

    #[error("seat {seat_id} is not available")]
    SeatNotAvailable { seat_id: String },

    #[error("seat {seat_id} is already selected")]
    SeatAlreadySelected { seat_id: String },

    #[error("seat {seat_id} is not part of the current selection")]
    SeatNotSelected { seat_id: String },

    #[error("no occurrence loaded")]
    NoOccurrence,

    #[error("no price for the requested seat and ticket type")]
    PriceMissing,

    #[error("no active quote for this order")]
    NoActiveQuote,

    #[error("checkout data is missing")]
    MissingCheckoutData,

    #[error("order record for payment {payment_id} is missing")]
    MissingOrderRecord { payment_id: String },

    #[error("seating widget event key is missing")]
    MissingEventKey,

    #[error("feature is disabled by configuration")]
    FeatureDisabled,

    #[error("invalid checkout details: {0}")]
    InvalidDetails(#[from] validator::ValidationErrors),

    #[error("each selected seat needs exactly one ticket holder")]
    HolderMismatch,
}

impl StorefrontError {
    /// Irrecoverable errors redirect the user to a safe earlier step;
    /// recoverable ones degrade to an inline message.
    pub fn redirect_step(&self) -> Option<SafeStep> {
        match self {
            StorefrontError::MissingCheckoutData => Some(SafeStep::SeatSelection),
            StorefrontError::MissingOrderRecord { .. } => Some(SafeStep::Checkout),
            StorefrontError::MissingEventKey => Some(SafeStep::OccurrenceList),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_code_wins_over_message_text() {
        let code = ErrorCode::parse(Some("QUOTE_EXPIRED"), None, "seat R1C1 is already taken");
        assert_eq!(code, ErrorCode::QuoteExpired);
    }

    #[test]
    fn seat_conflict_prefers_structured_seat_field() {
        let code = ErrorCode::parse(
            Some("SEAT_ALREADY_TAKEN"),
            Some("R5C12".to_string()),
            "conflict",
        );
        assert_eq!(
            code,
            ErrorCode::SeatAlreadyTaken {
                seat_id: "R5C12".to_string()
            }
        );
    }

    #[test]
    fn legacy_fallback_extracts_seat_from_message() {
        let code = ErrorCode::parse(None, None, "Seat R5C12 is already taken.");
        assert_eq!(
            code,
            ErrorCode::SeatAlreadyTaken {
                seat_id: "R5C12".to_string()
            }
        );
    }

    #[test]
    fn legacy_fallback_detects_expired_quote() {
        assert_eq!(
            ErrorCode::parse(None, None, "Quote 42 has expired"),
            ErrorCode::QuoteExpired
        );
    }

    #[test]
    fn unknown_messages_do_not_invent_codes() {
        assert_eq!(
            ErrorCode::parse(None, None, "internal server error"),
            ErrorCode::Unknown
        );
        assert_eq!(extract_seat_id("no seat token here"), None);
    }

    #[test]
    fn irrecoverable_errors_carry_a_redirect() {
        assert_eq!(
            StorefrontError::MissingCheckoutData.redirect_step(),
            Some(SafeStep::SeatSelection)
        );
        assert_eq!(
            StorefrontError::MissingEventKey.redirect_step(),
            Some(SafeStep::OccurrenceList)
        );
        assert_eq!(StorefrontError::NoActiveQuote.redirect_step(), None);
    }
}
