use chrono::{Duration, Utc};
use mockall::mock;
use wbs_common::Centavos;
use water_billing_engine::{
    db_types::{
        Bill,
        BillStats,
        MeterReading,
        NewMeterReading,
        NewNotification,
        NewSystemSettings,
        NewUser,
        Notification,
        Payment,
        PaymentMethod,
        ResourceId,
        Role,
        SystemSettings,
        User,
        UserCredentials,
    },
    query_objects::UserQueryFilter,
    traits::{
        AccountApiError,
        AccountManagement,
        AuthApiError,
        AuthManagement,
        BillSettlement,
        BillingDatabase,
        BillingError,
        NotificationManagement,
        SettingsManagement,
    },
};

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn fetch_user_by_id(&self, id: ResourceId) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError>;
        async fn search_users(&self, query: UserQueryFilter) -> Result<Vec<User>, AccountApiError>;
        async fn fetch_readings_for_user(&self, user_id: ResourceId) -> Result<Vec<MeterReading>, AccountApiError>;
        async fn fetch_reading_by_id(&self, id: ResourceId) -> Result<Option<MeterReading>, AccountApiError>;
        async fn fetch_bills_for_user(&self, user_id: ResourceId) -> Result<Vec<Bill>, AccountApiError>;
        async fn fetch_bill_by_id(&self, id: ResourceId) -> Result<Option<Bill>, AccountApiError>;
        async fn fetch_payments_for_user(&self, user_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;
        async fn fetch_payments_for_bill(&self, bill_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;
        async fn fetch_bill_stats(&self) -> Result<BillStats, AccountApiError>;
    }
}

mock! {
    pub AuthManager {}
    impl AuthManagement for AuthManager {
        async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;
        async fn fetch_credentials(&self, username: &str) -> Result<UserCredentials, AuthApiError>;
    }
}

// The billing flow backend carries its supertraits along; routes that only settle bills still need the whole
// surface to exist, even though most expectations stay unset.
mock! {
    pub BillingBackend {}
    impl BillingDatabase for BillingBackend {
        fn url(&self) -> &str;
        async fn process_new_reading(
            &self,
            reading: NewMeterReading,
            settings: &SystemSettings,
        ) -> Result<(MeterReading, Bill), BillingError>;
        async fn create_bill_for_reading(
            &self,
            reading_id: ResourceId,
            settings: &SystemSettings,
        ) -> Result<Bill, BillingError>;
        async fn settle_bill(&self, settlement: BillSettlement) -> Result<(Bill, Payment), BillingError>;
    }
    impl AccountManagement for BillingBackend {
        async fn fetch_user_by_id(&self, id: ResourceId) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError>;
        async fn search_users(&self, query: UserQueryFilter) -> Result<Vec<User>, AccountApiError>;
        async fn fetch_readings_for_user(&self, user_id: ResourceId) -> Result<Vec<MeterReading>, AccountApiError>;
        async fn fetch_reading_by_id(&self, id: ResourceId) -> Result<Option<MeterReading>, AccountApiError>;
        async fn fetch_bills_for_user(&self, user_id: ResourceId) -> Result<Vec<Bill>, AccountApiError>;
        async fn fetch_bill_by_id(&self, id: ResourceId) -> Result<Option<Bill>, AccountApiError>;
        async fn fetch_payments_for_user(&self, user_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;
        async fn fetch_payments_for_bill(&self, bill_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;
        async fn fetch_bill_stats(&self) -> Result<BillStats, AccountApiError>;
    }
    impl SettingsManagement for BillingBackend {
        async fn fetch_settings(&self) -> Result<SystemSettings, AccountApiError>;
        async fn replace_settings(&self, settings: NewSystemSettings) -> Result<SystemSettings, AccountApiError>;
    }
    impl NotificationManagement for BillingBackend {
        async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, AccountApiError>;
        async fn fetch_latest_notifications(
            &self,
            user_id: ResourceId,
            limit: i64,
        ) -> Result<Vec<Notification>, AccountApiError>;
        async fn register_device_token(&self, user_id: ResourceId, token: &str) -> Result<(), AccountApiError>;
        async fn fetch_device_token(&self, user_id: ResourceId) -> Result<Option<String>, AccountApiError>;
    }
    impl Clone for BillingBackend {
        fn clone(&self) -> Self;
    }
}

//--------------------------------------   Sample records    ---------------------------------------------------------

pub fn customer(id: i64) -> User {
    User {
        id: ResourceId::from(id),
        username: format!("customer{id}"),
        role: Role::Customer,
        full_name: "Maria Santos".to_string(),
        address: Some("Sitio Proper".to_string()),
        purok: Some("Riverside".to_string()),
        meter_number: Some("MTR-0042".to_string()),
        phone: None,
        email: None,
        device_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn unpaid_bill(id: i64, user_id: i64) -> Bill {
    Bill {
        id: ResourceId::from(id),
        user_id: ResourceId::from(user_id),
        reading_id: ResourceId::from(id),
        consumption: 40.0,
        amount_due: Centavos::from_pesos(450),
        due_date: Utc::now() + Duration::days(15),
        is_paid: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn settled(mut bill: Bill) -> Bill {
    bill.is_paid = true;
    bill.amount_due = Centavos::from(0);
    bill
}

pub fn payment_for(bill: &Bill, method: PaymentMethod) -> Payment {
    Payment {
        id: ResourceId::from(901),
        bill_id: bill.id,
        user_id: bill.user_id,
        method,
        amount: bill.amount_due,
        fee: method.fee(),
        gateway_ref: None,
        payment_date: Utc::now(),
        created_at: Utc::now(),
    }
}

/// The default tariff, materialized the way `fetch_settings` would return it.
pub fn current_settings() -> SystemSettings {
    let defaults = NewSystemSettings::default();
    SystemSettings {
        id: ResourceId::from(1),
        water_rate_per_cubic_meter: defaults.water_rate_per_cubic_meter,
        minimum_charge: defaults.minimum_charge,
        penalty_rate: defaults.penalty_rate,
        billing_cycle: defaults.billing_cycle,
        billing_day_of_month: defaults.billing_day_of_month,
        due_date_days: defaults.due_date_days,
        grace_period_days: defaults.grace_period_days,
        late_fee_method: defaults.late_fee_method,
        late_fee_fixed_amount: defaults.late_fee_fixed_amount,
        late_fee_tier_1_days: defaults.late_fee_tier_1_days,
        late_fee_tier_1_amount: defaults.late_fee_tier_1_amount,
        late_fee_tier_2_days: defaults.late_fee_tier_2_days,
        late_fee_tier_2_amount: defaults.late_fee_tier_2_amount,
        tiered_pricing_enabled: defaults.tiered_pricing_enabled,
        tier_1_threshold: defaults.tier_1_threshold,
        tier_1_rate: defaults.tier_1_rate,
        tier_2_threshold: defaults.tier_2_threshold,
        tier_2_rate: defaults.tier_2_rate,
        tier_3_threshold: defaults.tier_3_threshold,
        tier_3_rate: defaults.tier_3_rate,
        meter_reading_frequency: defaults.meter_reading_frequency,
        meter_reading_day: defaults.meter_reading_day,
        sms_notifications_enabled: defaults.sms_notifications_enabled,
        email_notifications_enabled: defaults.email_notifications_enabled,
        notification_days_before_due: defaults.notification_days_before_due,
        company_name: defaults.company_name,
        company_address: defaults.company_address,
        company_phone: defaults.company_phone,
        company_email: defaults.company_email,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
