use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbOverride, DbRecurringRule, DbTimeSlot};
use shepherd_core::models::{
    appointment::AppointmentStatus,
    overrides::NewOverride,
    rule::NewRecurringRule,
    slot::{SlotFilter, SlotSource, SlotStatus},
};

// Mock repositories for testing

mock! {
    pub RecurringRuleRepo {
        pub async fn create_rule(&self, rule: NewRecurringRule) -> eyre::Result<DbRecurringRule>;

        pub async fn get_active_rules_for_day(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
            day_of_week: i16,
        ) -> eyre::Result<Vec<DbRecurringRule>>;

        pub async fn list_rules_by_counselor(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
        ) -> eyre::Result<Vec<DbRecurringRule>>;

        pub async fn set_rule_active(
            &self,
            id: Uuid,
            church_id: Uuid,
            is_active: bool,
        ) -> eyre::Result<Option<DbRecurringRule>>;

        pub async fn active_counselor_ids(&self, church_id: Uuid) -> eyre::Result<Vec<Uuid>>;
    }
}

mock! {
    pub OverrideRepo {
        pub async fn create_override(&self, ov: NewOverride) -> eyre::Result<DbOverride>;

        pub async fn get_overrides_for_date(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbOverride>>;

        pub async fn list_overrides(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
            date_from: NaiveDate,
            date_to: NaiveDate,
        ) -> eyre::Result<Vec<DbOverride>>;

        pub async fn update_override(
            &self,
            id: Uuid,
            church_id: Uuid,
            start_time: NaiveTime,
            end_time: NaiveTime,
            reason: Option<&'static str>,
        ) -> eyre::Result<Option<DbOverride>>;

        pub async fn delete_override(&self, id: Uuid, church_id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub TimeSlotRepo {
        #[allow(clippy::too_many_arguments)]
        pub async fn insert_slot(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
            date: NaiveDate,
            start_time: NaiveTime,
            end_time: NaiveTime,
            status: SlotStatus,
            source: SlotSource,
        ) -> eyre::Result<DbTimeSlot>;

        pub async fn find_slot_by_identity(
            &self,
            church_id: Uuid,
            counselor_id: Uuid,
            date: NaiveDate,
            start_time: NaiveTime,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn update_slot_generation(
            &self,
            id: Uuid,
            end_time: NaiveTime,
            status: SlotStatus,
            source: SlotSource,
        ) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn get_slot(&self, id: Uuid, church_id: Uuid) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn list_slots(&self, filter: SlotFilter) -> eyre::Result<Vec<DbTimeSlot>>;

        pub async fn reserve_slot(
            &self,
            id: Uuid,
            church_id: Uuid,
            appointment_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn release_slot(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn insert_appointment(&self, appt: DbAppointment) -> eyre::Result<DbAppointment>;

        pub async fn get_appointment(
            &self,
            id: Uuid,
            church_id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn approve_appointment(
            &self,
            id: Uuid,
            staff_id: Uuid,
            admin_notes: Option<&'static str>,
        ) -> eyre::Result<DbAppointment>;

        pub async fn reject_appointment(
            &self,
            id: Uuid,
            reason: &'static str,
        ) -> eyre::Result<DbAppointment>;

        pub async fn cancel_appointment(&self, id: Uuid) -> eyre::Result<DbAppointment>;

        pub async fn complete_appointment(
            &self,
            id: Uuid,
            outcome_notes: Option<&'static str>,
        ) -> eyre::Result<DbAppointment>;

        pub async fn list_appointments(
            &self,
            church_id: Uuid,
            counselor_id: Option<Uuid>,
            member_id: Option<Uuid>,
            status: Option<AppointmentStatus>,
        ) -> eyre::Result<Vec<DbAppointment>>;
    }
}
