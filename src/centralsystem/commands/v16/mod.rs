//! v1.6 typed commands — one file per OCPP action

mod cancel_reservation;
mod change_availability;
mod change_configuration;
mod clear_cache;
mod clear_charging_profile;
mod data_transfer;
mod get_composite_schedule;
mod get_configuration;
mod get_diagnostics;
mod get_local_list_version;
mod iso15118;
mod remote_start;
mod remote_stop;
mod reserve_now;
mod reset;
mod security;
mod send_local_list;
mod set_charging_profile;
mod trigger_message;
mod unlock_connector;
mod update_firmware;
