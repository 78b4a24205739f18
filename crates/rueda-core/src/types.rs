//! # Domain Types
//!
//! Entities exchanged with the shop backend, plus the input DTOs the CRUD
//! commands validate before sending.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku            │   │  status         │   │  document       │       │
//! │  │  sale_price     │   │  payment_method │   │  balance (±)    │       │
//! │  │  current_stock  │   │  total          │   │  created_at     │       │
//! │  │  min/max_stock  │   │  SaleItem[]     │   │  Credit[]       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Wire format: camelCase JSON, amounts as decimals (12.50),             │
//! │  ids as strings or numbers (normalized to String).                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage stored in basis points, always within 0%..=100%.
///
/// Construction clamps, so a `Percent` can never hold an out-of-range value.
/// Deserialization goes through the same clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(from = "u32")]
#[ts(export)]
pub struct Percent(u32);

impl From<u32> for Percent {
    fn from(bps: u32) -> Self {
        Percent::from_bps(bps)
    }
}

impl Percent {
    const MAX_BPS: u32 = 10_000;

    /// Creates a percent from basis points, clamped to 10_000.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            Percent(Self::MAX_BPS)
        } else {
            Percent(bps)
        }
    }

    /// Creates a percent from a human value such as `12.5`, clamped to [0, 100].
    ///
    /// ```rust
    /// use rueda_core::types::Percent;
    ///
    /// assert_eq!(Percent::from_percentage(12.5).bps(), 1250);
    /// assert_eq!(Percent::from_percentage(150.0).bps(), 10_000);
    /// assert_eq!(Percent::from_percentage(-3.0).bps(), 0);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if pct.is_nan() || pct <= 0.0 {
            return Percent(0);
        }
        let bps = (pct * 100.0).round();
        if bps >= Self::MAX_BPS as f64 {
            Percent(Self::MAX_BPS)
        } else {
            Percent(bps as u32)
        }
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a percentage (for display and wire only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn full() -> Self {
        Percent(Self::MAX_BPS)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// The backend hands out numeric ids on some tables and string ids on others.
/// Both land in a `String`.
pub mod flexible_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        RawId::deserialize(deserializer).map(String::from)
    }

    pub mod option {
        use super::RawId;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<String>, D::Error> {
            Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
        }
    }
}

/// Backend timestamps. RFC 3339 is preferred, but older rows carry
/// `2026-05-20 13:00:00`, `2026-05-20T13:00` or a bare `2026-05-20`.
/// Values without an offset are read at [`crate::DEFAULT_UTC_OFFSET_HOURS`].
pub mod timestamp {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(dt.with_timezone(&Utc));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;
        match FixedOffset::east_opt(crate::DEFAULT_UTC_OFFSET_HOURS * 3600) {
            Some(shop) => shop
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            None => Some(Utc.from_utc_datetime(&naive)),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    /// Unreadable values become `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| super::parse(&raw)))
        }
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Product
// =============================================================================

/// A product in the shop catalog (bikes, parts, helmets, ...).
///
/// `current_stock` is authoritative from the backend; the cart reads it as a
/// ceiling and never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,

    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub sale_price: Money,

    #[serde(with = "crate::money::decimal", default)]
    #[ts(type = "number")]
    pub cost_price: Money,

    #[serde(default)]
    pub current_stock: i64,

    /// Reorder point; `None` or `0` falls back to [`crate::DEFAULT_LOW_STOCK_THRESHOLD`].
    #[serde(default)]
    pub min_stock: Option<i64>,

    #[serde(default)]
    pub max_stock: Option<i64>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    /// Threshold used by the low-stock counter.
    pub fn low_stock_threshold(&self) -> i64 {
        self.min_stock
            .filter(|m| *m > 0)
            .unwrap_or(crate::DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// True when stock sits at or below the reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.low_stock_threshold()
    }

    /// Gross margin per unit (sale − cost).
    pub fn unit_margin(&self) -> Money {
        self.sale_price - self.cost_price
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// =============================================================================
// Client
// =============================================================================

/// Venezuelan identity document prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DocumentType {
    /// Cédula de identidad (national).
    #[serde(rename = "V")]
    Venezuelan,
    /// Cédula de extranjero.
    #[serde(rename = "E")]
    Foreigner,
    /// RIF for companies.
    #[serde(rename = "J")]
    Company,
    /// RIF for government entities.
    #[serde(rename = "G")]
    Government,
    #[serde(rename = "P")]
    Passport,
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Venezuelan
    }
}

/// A shop client. A negative `balance` is money the client owes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(with = "crate::money::decimal", default)]
    #[ts(type = "number")]
    pub balance: Money,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// `V-12345678` style document label.
    pub fn document_label(&self) -> String {
        let prefix = match self.document_type {
            DocumentType::Venezuelan => "V",
            DocumentType::Foreigner => "E",
            DocumentType::Company => "J",
            DocumentType::Government => "G",
            DocumentType::Passport => "P",
        };
        format!("{}-{}", prefix, self.document_number)
    }

    pub fn has_debt(&self) -> bool {
        self.balance.is_negative()
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    /// Credit sale not yet paid.
    Pending,
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    /// "Pago móvil" bank-to-bank transfer.
    MobilePayment,
    /// Charged to the client's balance.
    Credit,
}

impl PaymentMethod {
    pub fn is_credit(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "card" | "tarjeta" => Ok(PaymentMethod::Card),
            "transfer" | "transferencia" => Ok(PaymentMethod::Transfer),
            "mobile_payment" | "pago_movil" => Ok(PaymentMethod::MobilePayment),
            "credit" | "credito" => Ok(PaymentMethod::Credit),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

/// A recorded sale as returned by `/sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub client_id: Option<String>,
    #[serde(with = "crate::money::decimal", default)]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::money::decimal", default)]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A sale line as returned by `/sale_items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub sale_id: String,
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub product_id: String,
    pub quantity: i64,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub unit_price: Money,
    #[serde(with = "crate::money::decimal", default)]
    #[ts(type = "number")]
    pub line_total: Money,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Credit (balance adjustment)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    /// Increases what the client owes.
    Charge,
    /// Client pays down the debt.
    Payment,
}

/// A balance movement recorded under `/clients/{id}/credits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Credit {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub client_id: String,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub amount: Money,
    pub kind: CreditKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Credit {
    /// Signed effect on the client's balance (charges go negative).
    pub fn balance_effect(&self) -> Money {
        match self.kind {
            CreditKind::Charge => -self.amount,
            CreditKind::Payment => self.amount,
        }
    }
}

// =============================================================================
// Input DTOs (create / update bodies)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub sale_price: Money,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub cost_price: Money,
    pub current_stock: i64,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientInput {
    pub name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Body for `POST /clients/{id}/credits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreditInput {
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub amount: Money,
    pub kind: CreditKind,
    pub description: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
