//! SVG export serializer.
//!
//! Renders a decomposition as an SVG string using the [`svg`] crate for
//! document construction, XML escaping, and path data formatting.
//!
//! Each rectangle becomes a filled `<rect>` inside `<g id="rectangles">`,
//! coloured from [`RECT_COLORS`] in extraction order, and the polygon
//! outline is drawn on top as a single `<path>`. Polygon coordinates are
//! y-up; the document is y-down, so every coordinate is flipped about the
//! polygon's bounding box.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements for
//! accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Group, Path, Rectangle as Rect, Title};
use svg::node::{Node, Text, Value};

use orthorect::{Point, Polygon, Rectangle, Ring};

/// Margin around the polygon, as a fraction of its larger extent.
const MARGIN_RATIO: f64 = 0.0625;

/// Fill colours cycled over rectangles in extraction order.
pub const RECT_COLORS: &[&str] = &[
    "#ff3333", // red
    "#ff8800", // orange
    "#ffdd00", // yellow
    "#33cc33", // green
    "#3399ff", // blue
    "#aa66ff", // violet
];

/// Metadata to embed in the SVG document.
///
/// All fields are optional.  When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the input file stem.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized decomposition configuration, emitted inside a
    /// `<metadata>` element wrapped in a namespaced `<orthorect:config>`
    /// element so exported files carry the settings that produced them.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a ring.
///
/// Uses `M` for the first point and `L` for every following point,
/// including the closing duplicate. Returns an empty string for rings
/// with fewer than 2 points.
///
/// Coordinates are formatted by the [`svg`] crate using `f32` precision.
///
/// # Examples
///
/// ```
/// use orthorect::{Point, Ring};
/// use orthorect_export::build_path_data;
///
/// let ring = Ring::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 2.5),
/// ]);
/// assert_eq!(build_path_data(&ring), "M0,0 L4,0 L4,2.5 L0,0");
/// ```
#[must_use]
pub fn build_path_data(ring: &Ring) -> String {
    build_path_data_with(ring, |p| (p.x, p.y))
}

fn build_path_data_with(ring: &Ring, tx: impl Fn(&Point) -> (f64, f64)) -> String {
    let points = ring.points();
    if points.len() < 2 {
        return String::new();
    }

    let mut data = Data::new().move_to(tx(&points[0]));
    for p in &points[1..] {
        data = data.line_to(tx(p));
    }
    String::from(Value::from(data))
}

/// Axis-aligned bounds of the polygon's exterior.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    fn of(ring: &Ring) -> Self {
        let mut points = ring.points().iter();
        let Some(first) = points.next() else {
            return Self {
                min_x: 0.0,
                max_x: 0.0,
                min_y: 0.0,
                max_y: 0.0,
            };
        };
        points.fold(
            Self {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    const fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    const fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Serialize a polygon and its decomposition into an SVG document string.
///
/// The document is sized to the polygon's bounding box plus a margin, in
/// polygon units.
///
/// # Examples
///
/// ```
/// use orthorect::{DecomposeConfig, Point, Polygon, decompose};
/// use orthorect_export::{SvgMetadata, to_svg};
///
/// let polygon = Polygon::from_vertices(vec![
///     Point::new(0.0, 0.0),
///     Point::new(16.0, 0.0),
///     Point::new(16.0, 8.0),
///     Point::new(0.0, 8.0),
/// ]);
/// let rects = decompose(&polygon, &DecomposeConfig::default()).unwrap();
/// let metadata = SvgMetadata {
///     title: Some("bar"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&polygon, &rects, &metadata);
/// assert!(svg.contains("<title>bar</title>"));
/// assert!(svg.contains(r#"viewBox="0 0 18 10""#));
/// ```
#[must_use]
pub fn to_svg(polygon: &Polygon, rectangles: &[Rectangle], metadata: &SvgMetadata<'_>) -> String {
    let bounds = Bounds::of(&polygon.exterior);
    let margin = bounds.width().max(bounds.height()) * MARGIN_RATIO;
    let doc_width = 2.0f64.mul_add(margin, bounds.width());
    let doc_height = 2.0f64.mul_add(margin, bounds.height());

    // Polygon (y-up) to document (y-down).
    let tx = |p: &Point| {
        (
            p.x - bounds.min_x + margin,
            bounds.max_y - p.y + margin,
        )
    };

    let mut doc = Document::new()
        .set("width", doc_width)
        .set("height", doc_height)
        .set("viewBox", format!("0 0 {doc_width} {doc_height}"));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    // Optional <metadata> element with the decomposition config
    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("orthorect:config");
        config_el.assign("xmlns:orthorect", "https://orthorect.dev/ns/1");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    if !rectangles.is_empty() {
        let mut group = Group::new().set("id", "rectangles");
        for (i, r) in rectangles.iter().enumerate() {
            // Top-left corner in document space is the rectangle's
            // (min.x, max.y).
            let (x, y) = tx(&Point::new(r.min().x, r.max().y));
            let rect = Rect::new()
                .set("x", x)
                .set("y", y)
                .set("width", r.width())
                .set("height", r.height())
                .set("fill", RECT_COLORS[i % RECT_COLORS.len()])
                .set("fill-opacity", 0.6)
                .set("stroke", "white")
                .set("stroke-width", 0.5)
                .set("vector-effect", "non-scaling-stroke")
                .set("data-index", i.to_string());
            group = group.add(rect);
        }
        doc = doc.add(group);
    }

    let d = build_path_data_with(&polygon.exterior, tx);
    if !d.is_empty() {
        let outline = Path::new()
            .set("id", "outline")
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 1)
            .set("vector-effect", "non-scaling-stroke");
        doc = doc.add(outline);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
