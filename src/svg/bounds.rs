//! Stroke-inclusive bounding box and viewBox expansion.
//!
//! Thick strokes at the edge of an icon get clipped by a tight viewBox.
//! `expandViewBox` grows the viewBox to the union of all stroke bounds.

use std::sync::LazyLock;

use regex::Regex;
use usvg::{Group, Node, Rect, Tree};

use crate::html::util::start_tag_end;

static VIEWBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[ \t\r\n]viewBox=(?:"[^"]*"|'[^']*')"#).unwrap());

/// Union of the stroke bounding boxes of every node, `None` for an empty tree.
pub fn stroke_bounds(tree: &Tree) -> Option<Rect> {
    let mut bounds = None;
    accumulate(tree.root(), &mut bounds);
    bounds
}

fn accumulate(group: &Group, bounds: &mut Option<Rect>) {
    for node in group.children() {
        let rect = node.stroke_bounding_box();
        *bounds = Some(match *bounds {
            Some(acc) => union(acc, rect).unwrap_or(acc),
            None => rect,
        });
        if let Node::Group(nested) = node {
            accumulate(nested, bounds);
        }
    }
}

fn union(a: Rect, b: Rect) -> Option<Rect> {
    let left = a.x().min(b.x());
    let top = a.y().min(b.y());
    let right = a.right().max(b.right());
    let bottom = a.bottom().max(b.bottom());
    Rect::from_xywh(left, top, right - left, bottom - top)
}

/// Set the root element's viewBox to `bounds`.
pub fn expand_viewbox(svg: &str, bounds: Rect) -> String {
    let viewbox = format!(
        r#" viewBox="{} {} {} {}""#,
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height()
    );
    set_root_viewbox(svg, &viewbox)
}

/// Replace (or insert) the viewBox attribute on the root `<svg>` start tag only.
fn set_root_viewbox(svg: &str, attr: &str) -> String {
    let Some(open) = svg.find("<svg") else {
        return svg.to_owned();
    };
    let close = start_tag_end(svg, open);
    let tag = &svg[open..close];

    let new_tag = if VIEWBOX_RE.is_match(tag) {
        VIEWBOX_RE.replace(tag, attr).into_owned()
    } else {
        format!("{}{}{}", &tag[..4], attr, &tag[4..])
    };

    format!("{}{}{}", &svg[..open], new_tag, &svg[close..])
}
