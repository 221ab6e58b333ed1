pub mod domain;

pub use domain::{
    duration::{elapsed_seconds, format_duration, format_duration_human, total_break_seconds},
    models::*,
    ports::outbound::{AddBreakRequest, EntryGateway, MockEntryGateway},
    services::{BulkCoordinator, EntryService},
    ticker::ReconciliationTicker,
    transitions::{apply_local_transition, legal_actions, EntryAction},
    TimeEntryError,
};
