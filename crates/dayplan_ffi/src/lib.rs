//! Flutter-facing bindings over `dayplan_core`.

pub mod api;
