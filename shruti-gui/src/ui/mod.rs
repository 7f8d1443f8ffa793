//! # UI Module
//!
//! This module contains all UI components for the Shruti viewer.

pub mod contour_plot;
pub mod deviation_meter;
pub mod main_display;
pub mod metrics_display;
pub mod swara_strip;
