//! Status and classification enums for various entities.
//!
//! Text-backed enums are stored in `PostgreSQL` as plain `TEXT` using their
//! `Display` form and parsed back with `FromStr`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored enum value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Account role.
///
/// Stored as a `SMALLINT`: 0 customer, 1 admin, 2 staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
    Staff,
}

impl UserRole {
    /// Database representation.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Customer => 0,
            Self::Admin => 1,
            Self::Staff => 2,
        }
    }

    /// Whether this role may use the back-office.
    #[must_use]
    pub const fn is_back_office(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

impl TryFrom<i16> for UserRole {
    type Error = ParseEnumError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Customer),
            1 => Ok(Self::Admin),
            2 => Ok(Self::Staff),
            other => Err(ParseEnumError::new("user role", other.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

/// Sentiment label attached to a review.
///
/// `Spam` is never produced by a sentiment classifier; it overwrites the label
/// once the spam pass flags a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    #[serde(rename = "POS")]
    Positive,
    #[default]
    #[serde(rename = "NEU")]
    Neutral,
    #[serde(rename = "NEG")]
    Negative,
    Spam,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POS"),
            Self::Neutral => write!(f, "NEU"),
            Self::Negative => write!(f, "NEG"),
            Self::Spam => write!(f, "SPAM"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POS" => Ok(Self::Positive),
            "NEU" => Ok(Self::Neutral),
            "NEG" => Ok(Self::Negative),
            "SPAM" => Ok(Self::Spam),
            _ => Err(ParseEnumError::new("sentiment", s)),
        }
    }
}

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    BankTransfer,
    Momo,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cod => write!(f, "COD"),
            Self::BankTransfer => write!(f, "BANK_TRANSFER"),
            Self::Momo => write!(f, "MOMO"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(Self::Cod),
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "MOMO" => Ok(Self::Momo),
            _ => Err(ParseEnumError::new("payment method", s)),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipping,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipping => write!(f, "shipping"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipping" => Ok(Self::Shipping),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("order status", s)),
        }
    }
}

/// Grouping for spam keywords in the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpamCategory {
    Advertising,
    Profanity,
    Scam,
    Competitor,
    #[default]
    Other,
}

impl fmt::Display for SpamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advertising => write!(f, "ADVERTISING"),
            Self::Profanity => write!(f, "PROFANITY"),
            Self::Scam => write!(f, "SCAM"),
            Self::Competitor => write!(f, "COMPETITOR"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl FromStr for SpamCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVERTISING" => Ok(Self::Advertising),
            "PROFANITY" => Ok(Self::Profanity),
            "SCAM" => Ok(Self::Scam),
            "COMPETITOR" => Ok(Self::Competitor),
            "OTHER" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("spam category", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_round_trip_i16() {
        for role in [UserRole::Customer, UserRole::Admin, UserRole::Staff] {
            assert_eq!(UserRole::try_from(role.as_i16()).unwrap(), role);
        }
        assert!(UserRole::try_from(7).is_err());
    }

    #[test]
    fn test_back_office_roles() {
        assert!(!UserRole::Customer.is_back_office());
        assert!(UserRole::Admin.is_back_office());
        assert!(UserRole::Staff.is_back_office());
    }

    #[test]
    fn test_sentiment_text_form() {
        assert_eq!(Sentiment::Positive.to_string(), "POS");
        assert_eq!("SPAM".parse::<Sentiment>().unwrap(), Sentiment::Spam);
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"NEG\""
        );
        assert!("pos".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("COD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cod);
        let err = "CRYPTO".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err.to_string(), "invalid payment method: CRYPTO");
    }

    #[test]
    fn test_spam_category_display_matches_parse() {
        for category in [
            SpamCategory::Advertising,
            SpamCategory::Profanity,
            SpamCategory::Scam,
            SpamCategory::Competitor,
            SpamCategory::Other,
        ] {
            assert_eq!(category.to_string().parse::<SpamCategory>().unwrap(), category);
        }
    }
}
