//! Shared components. The dashboard cards, the origin autocomplete and the
//! layout pieces they sit in.
pub mod error_banner;
pub mod filter_bar;
pub mod managed_icon;
pub mod metric_card;
pub mod origin_autocomplete;
pub mod pico;
pub mod sidebar;
