use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{FromRow, Type};
use thiserror::Error;
use wbs_common::Centavos;

//--------------------------------------     ResourceId      ---------------------------------------------------------

/// The primary key type for every record in the billing database.
///
/// Ids are `i64` internally, but are serialized as **strings** on every external surface, and can be deserialized
/// from either a string or a number. This keeps javascript clients, which truncate large integers, honest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Type)]
#[sqlx(transparent)]
pub struct ResourceId(i64);

impl ResourceId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ResourceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = ResourceId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an integer id, or a string containing one")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ResourceId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v).map(ResourceId).map_err(|_| E::custom(format!("id {v} is out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse::<ResourceId>().map_err(|e| E::custom(format!("invalid id '{v}': {e}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

//--------------------------------------        Role         ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A water consumer. Can view their own readings, bills and payments.
    Customer,
    /// A field worker who captures meter readings.
    MeterReader,
    /// Utility staff with full access.
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::MeterReader => write!(f, "meter_reader"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "meter_reader" => Ok(Self::MeterReader),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid role: {value}. But this conversion cannot fail. Defaulting to customer");
            Role::Customer
        })
    }
}

//--------------------------------------   PaymentMethod     ---------------------------------------------------------

/// The ways a bill can be settled, together with the convenience fee each one carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    GCash,
    PayMaya,
    #[sqlx(rename = "Credit/Debit Card")]
    #[serde(rename = "Credit/Debit Card")]
    Card,
    #[sqlx(rename = "Saved Cards (Visa/Mastercard)")]
    #[serde(rename = "Saved Cards (Visa/Mastercard)")]
    SavedCard,
    #[sqlx(rename = "Bank Transfer")]
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[sqlx(rename = "Over-the-Counter")]
    #[serde(rename = "Over-the-Counter")]
    OverTheCounter,
    Unknown,
}

impl PaymentMethod {
    /// The convenience fee for this payment method. Unrecognised methods are fee-free rather than an error.
    pub fn fee(&self) -> Centavos {
        match self {
            PaymentMethod::Card | PaymentMethod::SavedCard => Centavos::from_pesos(15),
            PaymentMethod::BankTransfer => Centavos::from_pesos(10),
            PaymentMethod::OverTheCounter => Centavos::from_pesos(5),
            PaymentMethod::Cash | PaymentMethod::GCash | PaymentMethod::PayMaya | PaymentMethod::Unknown => {
                Centavos::from(0)
            },
        }
    }

    /// Maps a payment method code as reported by the gateway onto a canonical method.
    pub fn from_gateway_code(code: &str) -> Self {
        match code {
            "gcash" => Self::GCash,
            "paymaya" => Self::PayMaya,
            "card" => Self::Card,
            "dob" | "doku_bank_transfer" => Self::BankTransfer,
            other => {
                warn!("Unrecognised payment method code from the gateway: {other}. Recording it as fee-free.");
                Self::Unknown
            },
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::GCash => write!(f, "GCash"),
            PaymentMethod::PayMaya => write!(f, "PayMaya"),
            PaymentMethod::Card => write!(f, "Credit/Debit Card"),
            PaymentMethod::SavedCard => write!(f, "Saved Cards (Visa/Mastercard)"),
            PaymentMethod::BankTransfer => write!(f, "Bank Transfer"),
            PaymentMethod::OverTheCounter => write!(f, "Over-the-Counter"),
            PaymentMethod::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            "GCash" => Ok(Self::GCash),
            "PayMaya" => Ok(Self::PayMaya),
            "Credit/Debit Card" => Ok(Self::Card),
            "Saved Cards (Visa/Mastercard)" => Ok(Self::SavedCard),
            "Bank Transfer" => Ok(Self::BankTransfer),
            "Over-the-Counter" => Ok(Self::OverTheCounter),
            "Unknown" => Ok(Self::Unknown),
            s => Err(ConversionError(format!("Invalid payment method: {s}"))),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment method: {value}. But this conversion cannot fail. Defaulting to Unknown");
            PaymentMethod::Unknown
        })
    }
}

//--------------------------------------   LateFeeMethod     ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LateFeeMethod {
    Fixed,
    Tiered,
}

impl Display for LateFeeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LateFeeMethod::Fixed => write!(f, "fixed"),
            LateFeeMethod::Tiered => write!(f, "tiered"),
        }
    }
}

impl From<String> for LateFeeMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "fixed" => Self::Fixed,
            "tiered" => Self::Tiered,
            other => {
                error!("Invalid late fee method: {other}. Defaulting to fixed");
                Self::Fixed
            },
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    pub address: Option<String>,
    pub purok: Option<String>,
    pub meter_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub device_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The credential subset of a user record, kept separate so that password hashes never travel with [`User`].
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: ResourceId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    /// A bcrypt hash. Hashing happens at the server boundary; the engine never sees plaintext passwords.
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub address: Option<String>,
    pub purok: Option<String>,
    pub meter_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewUser {
    pub fn new<S: Into<String>>(username: S, password_hash: S, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            full_name: String::new(),
            address: None,
            purok: None,
            meter_number: None,
            phone: None,
            email: None,
        }
    }
}

//--------------------------------------    MeterReading     ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: ResourceId,
    pub user_id: ResourceId,
    /// The meter counter in cubic meters. Monotonically increasing for a healthy meter.
    pub reading_value: f64,
    pub photo_url: Option<String>,
    pub reading_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeterReading {
    pub user_id: ResourceId,
    pub reading_value: f64,
    /// An opaque reference to a photo of the meter face. The server never dereferences it.
    pub photo_url: Option<String>,
    /// When the reading was taken. Defaults to the time of capture.
    pub reading_date: Option<DateTime<Utc>>,
}

impl NewMeterReading {
    pub fn new(user_id: ResourceId, reading_value: f64) -> Self {
        Self { user_id, reading_value, photo_url: None, reading_date: None }
    }

    pub fn with_photo_url<S: Into<String>>(mut self, url: S) -> Self {
        self.photo_url = Some(url.into());
        self
    }
}

//--------------------------------------        Bill         ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Bill {
    pub id: ResourceId,
    pub user_id: ResourceId,
    pub reading_id: ResourceId,
    /// Cubic meters consumed since the previous reading.
    pub consumption: f64,
    /// The outstanding amount. Zeroed when the bill is settled.
    pub amount_due: Centavos,
    pub due_date: DateTime<Utc>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBill {
    pub user_id: ResourceId,
    pub reading_id: ResourceId,
    pub consumption: f64,
    pub amount_due: Centavos,
    pub due_date: DateTime<Utc>,
}

//--------------------------------------      Payment        ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: ResourceId,
    pub bill_id: ResourceId,
    pub user_id: ResourceId,
    pub method: PaymentMethod,
    /// The amount applied to the bill, excluding the convenience fee.
    pub amount: Centavos,
    pub fee: Centavos,
    /// The gateway's payment intent id, where one exists. Cash payments have none.
    pub gateway_ref: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    Notification     ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Notification {
    pub id: ResourceId,
    pub user_id: ResourceId,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: ResourceId,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    pub fn new(user_id: ResourceId, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { user_id, title: title.into(), message: message.into() }
    }
}

//--------------------------------------       Issue         ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Issue {
    pub id: ResourceId,
    pub user_id: ResourceId,
    pub description: String,
    pub reported_date: DateTime<Utc>,
    pub is_resolved: bool,
    /// When a repair crew is scheduled to visit. Setting this notifies the reporter.
    pub fixing_date: Option<DateTime<Utc>>,
    pub resolved_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub user_id: ResourceId,
    pub description: String,
}

impl NewIssue {
    pub fn new<S: Into<String>>(user_id: ResourceId, description: S) -> Self {
        Self { user_id, description: description.into() }
    }
}

/// A partial update for an issue. Only the provided fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub is_resolved: Option<bool>,
    pub fixing_date: Option<DateTime<Utc>>,
    pub resolved_date: Option<DateTime<Utc>>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.is_resolved.is_none() && self.fixing_date.is_none() && self.resolved_date.is_none()
    }

    pub fn resolved(mut self, when: DateTime<Utc>) -> Self {
        self.is_resolved = Some(true);
        self.resolved_date = Some(when);
        self
    }

    pub fn schedule_fix(mut self, when: DateTime<Utc>) -> Self {
        self.fixing_date = Some(when);
        self
    }
}

//--------------------------------------   SystemSettings    ---------------------------------------------------------

/// The utility's billing configuration. There is one logical record; the latest row wins.
///
/// The calculator never reads these directly. Flows fetch the current record and pass the relevant values in, so
/// that a bill is always priced against one consistent snapshot.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SystemSettings {
    pub id: ResourceId,
    pub water_rate_per_cubic_meter: Centavos,
    pub minimum_charge: Centavos,
    pub penalty_rate: f64,
    pub billing_cycle: String,
    pub billing_day_of_month: i64,
    pub due_date_days: i64,
    pub grace_period_days: i64,
    pub late_fee_method: LateFeeMethod,
    pub late_fee_fixed_amount: Centavos,
    pub late_fee_tier_1_days: i64,
    pub late_fee_tier_1_amount: Centavos,
    pub late_fee_tier_2_days: i64,
    pub late_fee_tier_2_amount: Centavos,
    pub tiered_pricing_enabled: bool,
    pub tier_1_threshold: f64,
    pub tier_1_rate: Centavos,
    pub tier_2_threshold: f64,
    pub tier_2_rate: Centavos,
    pub tier_3_threshold: f64,
    pub tier_3_rate: Centavos,
    pub meter_reading_frequency: String,
    pub meter_reading_day: i64,
    pub sms_notifications_enabled: bool,
    pub email_notifications_enabled: bool,
    pub notification_days_before_due: i64,
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub company_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SystemSettings {
    /// Strips the row metadata, leaving a record that can be edited and resubmitted.
    pub fn into_new(self) -> NewSystemSettings {
        NewSystemSettings {
            water_rate_per_cubic_meter: self.water_rate_per_cubic_meter,
            minimum_charge: self.minimum_charge,
            penalty_rate: self.penalty_rate,
            billing_cycle: self.billing_cycle,
            billing_day_of_month: self.billing_day_of_month,
            due_date_days: self.due_date_days,
            grace_period_days: self.grace_period_days,
            late_fee_method: self.late_fee_method,
            late_fee_fixed_amount: self.late_fee_fixed_amount,
            late_fee_tier_1_days: self.late_fee_tier_1_days,
            late_fee_tier_1_amount: self.late_fee_tier_1_amount,
            late_fee_tier_2_days: self.late_fee_tier_2_days,
            late_fee_tier_2_amount: self.late_fee_tier_2_amount,
            tiered_pricing_enabled: self.tiered_pricing_enabled,
            tier_1_threshold: self.tier_1_threshold,
            tier_1_rate: self.tier_1_rate,
            tier_2_threshold: self.tier_2_threshold,
            tier_2_rate: self.tier_2_rate,
            tier_3_threshold: self.tier_3_threshold,
            tier_3_rate: self.tier_3_rate,
            meter_reading_frequency: self.meter_reading_frequency,
            meter_reading_day: self.meter_reading_day,
            sms_notifications_enabled: self.sms_notifications_enabled,
            email_notifications_enabled: self.email_notifications_enabled,
            notification_days_before_due: self.notification_days_before_due,
            company_name: self.company_name,
            company_address: self.company_address,
            company_phone: self.company_phone,
            company_email: self.company_email,
        }
    }
}

/// A full settings record, as submitted by an administrator. Updates are whole-record and last-writer-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSystemSettings {
    pub water_rate_per_cubic_meter: Centavos,
    pub minimum_charge: Centavos,
    pub penalty_rate: f64,
    pub billing_cycle: String,
    pub billing_day_of_month: i64,
    pub due_date_days: i64,
    pub grace_period_days: i64,
    pub late_fee_method: LateFeeMethod,
    pub late_fee_fixed_amount: Centavos,
    pub late_fee_tier_1_days: i64,
    pub late_fee_tier_1_amount: Centavos,
    pub late_fee_tier_2_days: i64,
    pub late_fee_tier_2_amount: Centavos,
    pub tiered_pricing_enabled: bool,
    pub tier_1_threshold: f64,
    pub tier_1_rate: Centavos,
    pub tier_2_threshold: f64,
    pub tier_2_rate: Centavos,
    pub tier_3_threshold: f64,
    pub tier_3_rate: Centavos,
    pub meter_reading_frequency: String,
    pub meter_reading_day: i64,
    pub sms_notifications_enabled: bool,
    pub email_notifications_enabled: bool,
    pub notification_days_before_due: i64,
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub company_email: String,
}

impl Default for NewSystemSettings {
    fn default() -> Self {
        Self {
            water_rate_per_cubic_meter: Centavos::from_pesos(10),
            minimum_charge: Centavos::from_pesos(50),
            penalty_rate: 0.1,
            billing_cycle: "monthly".to_string(),
            billing_day_of_month: 1,
            due_date_days: 15,
            grace_period_days: 3,
            late_fee_method: LateFeeMethod::Fixed,
            late_fee_fixed_amount: Centavos::from_pesos(50),
            late_fee_tier_1_days: 15,
            late_fee_tier_1_amount: Centavos::from_pesos(50),
            late_fee_tier_2_days: 30,
            late_fee_tier_2_amount: Centavos::from_pesos(100),
            tiered_pricing_enabled: false,
            tier_1_threshold: 10.0,
            tier_1_rate: Centavos::from_pesos(10),
            tier_2_threshold: 20.0,
            tier_2_rate: Centavos::from_pesos(12),
            tier_3_threshold: 30.0,
            tier_3_rate: Centavos::from_pesos(15),
            meter_reading_frequency: "monthly".to_string(),
            meter_reading_day: 1,
            sms_notifications_enabled: false,
            email_notifications_enabled: true,
            notification_days_before_due: 3,
            company_name: "Water Billing Service".to_string(),
            company_address: String::new(),
            company_phone: String::new(),
            company_email: String::new(),
        }
    }
}

//--------------------------------------     BillStats       ---------------------------------------------------------

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct BillStats {
    pub pending_bills: i64,
    pub paid_bills: i64,
    /// Sum of payments (excluding fees) received since the start of the current month.
    pub month_revenue: Centavos,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fee_schedule() {
        assert_eq!(PaymentMethod::GCash.fee(), Centavos::from(0));
        assert_eq!(PaymentMethod::PayMaya.fee(), Centavos::from(0));
        assert_eq!(PaymentMethod::Cash.fee(), Centavos::from(0));
        assert_eq!(PaymentMethod::Card.fee(), Centavos::from(1500));
        assert_eq!(PaymentMethod::SavedCard.fee(), Centavos::from(1500));
        assert_eq!(PaymentMethod::BankTransfer.fee(), Centavos::from(1000));
        assert_eq!(PaymentMethod::OverTheCounter.fee(), Centavos::from(500));
        assert_eq!(PaymentMethod::Unknown.fee(), Centavos::from(0));
    }

    #[test]
    fn gateway_method_codes() {
        assert_eq!(PaymentMethod::from_gateway_code("gcash"), PaymentMethod::GCash);
        assert_eq!(PaymentMethod::from_gateway_code("paymaya"), PaymentMethod::PayMaya);
        assert_eq!(PaymentMethod::from_gateway_code("card"), PaymentMethod::Card);
        assert_eq!(PaymentMethod::from_gateway_code("dob"), PaymentMethod::BankTransfer);
        assert_eq!(PaymentMethod::from_gateway_code("doku_bank_transfer"), PaymentMethod::BankTransfer);
        assert_eq!(PaymentMethod::from_gateway_code("carrier_pigeon"), PaymentMethod::Unknown);
        assert_eq!(PaymentMethod::from_gateway_code("carrier_pigeon").fee(), Centavos::from(0));
    }

    #[test]
    fn method_names_round_trip() {
        let methods = [
            PaymentMethod::Cash,
            PaymentMethod::GCash,
            PaymentMethod::PayMaya,
            PaymentMethod::Card,
            PaymentMethod::SavedCard,
            PaymentMethod::BankTransfer,
            PaymentMethod::OverTheCounter,
        ];
        for m in methods {
            assert_eq!(m.to_string().parse::<PaymentMethod>().unwrap(), m);
        }
        assert_eq!(PaymentMethod::Card.to_string(), "Credit/Debit Card");
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "Bank Transfer");
    }

    #[test]
    fn resource_ids_serialize_as_strings() {
        let id = ResourceId::from(9_007_199_254_740_993i64);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""9007199254740993""#);
        let from_string: ResourceId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(from_string, ResourceId::from(42));
        let from_number: ResourceId = serde_json::from_str("42").unwrap();
        assert_eq!(from_number, ResourceId::from(42));
        assert!(serde_json::from_str::<ResourceId>(r#""pretzel""#).is_err());
    }

    #[test]
    fn roles_parse() {
        assert_eq!("meter_reader".parse::<Role>().unwrap(), Role::MeterReader);
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(Role::from("junk".to_string()), Role::Customer);
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
