//! wiscar-report — SVG radar charts and HTML assessment reports.

pub mod html;
pub mod svg;
