pub mod appointment;
pub mod overrides;
pub mod recurring_rule;
pub mod time_slot;
