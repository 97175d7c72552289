//! v2.0.1 typed commands — one file per OCPP action

mod cancel_reservation;
mod certificate_signed;
mod change_availability;
mod clear_cache;
mod clear_charging_profile;
mod clear_variable_monitoring;
mod data_transfer;
mod delete_certificate;
mod get_base_report;
mod get_charging_profiles;
mod get_composite_schedule;
mod get_installed_certificate_ids;
mod get_local_list_version;
mod get_log;
mod get_transaction_status;
mod get_variables;
mod install_certificate;
mod request_start;
mod request_stop;
mod reserve_now;
mod reset;
mod send_local_list;
mod set_charging_profile;
mod set_monitoring_base;
mod set_variable_monitoring;
mod set_variables;
mod trigger_message;
mod unlock_connector;
mod update_firmware;
