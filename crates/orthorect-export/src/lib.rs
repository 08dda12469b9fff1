//! orthorect-export: Pure format serializers (sans-IO)
//!
//! Renders polygons and their rectangle decompositions into output
//! formats. Currently supports SVG.

pub mod svg;

pub use svg::{RECT_COLORS, SvgMetadata, build_path_data, to_svg};
