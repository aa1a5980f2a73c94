//! Child layouts read from the properties of a composite object
//!
//! Layouts are declared with properties whose names contain a layout keyword
//! (`LeftPadding`, `AnchorOrigin`, ...) and whose extra information lists the
//! children they apply to. For instance a `ButtonLeftPadding` property with
//! extra information `["Background", "Label"]` sets the left margin of both
//! children to the property value.

use std::collections::HashMap;

use bevy_log::debug;
use serde::{Deserialize, Serialize};

use crate::model::{AxisLayout, ChildLayout, EdgeAnchor};

/// Declaration of a property of a composite object
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPropertyDescriptor {
    pub name: String,
    /// Children the property applies to, or the anchor target for `*AnchorTarget` properties
    #[serde(default)]
    pub extra_info: Vec<String>,
}

impl LayoutPropertyDescriptor {
    pub fn new(name: impl Into<String>, extra_info: &[&str]) -> Self {
        Self {
            name: name.into(),
            extra_info: extra_info.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutField {
    Show,
    LeftPadding,
    TopPadding,
    RightPadding,
    BottomPadding,
    LeftEdgeAnchor,
    RightEdgeAnchor,
    TopEdgeAnchor,
    BottomEdgeAnchor,
    HorizontalAnchorOrigin,
    HorizontalAnchorTarget,
    VerticalAnchorOrigin,
    VerticalAnchorTarget,
    AnchorOrigin,
    AnchorTarget,
    AnchorDeltaX,
    AnchorDeltaY,
    IsScaledProportionallyOnX,
    IsScaledProportionallyOnY,
    IsScaledProportionallyOnZ,
    IsScaledProportionally,
}

/// Keywords searched in property names, in priority order
const LAYOUT_FIELDS: [(&str, LayoutField); 21] = [
    ("Show", LayoutField::Show),
    ("LeftPadding", LayoutField::LeftPadding),
    ("TopPadding", LayoutField::TopPadding),
    ("RightPadding", LayoutField::RightPadding),
    ("BottomPadding", LayoutField::BottomPadding),
    ("LeftEdgeAnchor", LayoutField::LeftEdgeAnchor),
    ("RightEdgeAnchor", LayoutField::RightEdgeAnchor),
    ("TopEdgeAnchor", LayoutField::TopEdgeAnchor),
    ("BottomEdgeAnchor", LayoutField::BottomEdgeAnchor),
    ("HorizontalAnchorOrigin", LayoutField::HorizontalAnchorOrigin),
    ("HorizontalAnchorTarget", LayoutField::HorizontalAnchorTarget),
    ("VerticalAnchorOrigin", LayoutField::VerticalAnchorOrigin),
    ("VerticalAnchorTarget", LayoutField::VerticalAnchorTarget),
    ("AnchorOrigin", LayoutField::AnchorOrigin),
    ("AnchorTarget", LayoutField::AnchorTarget),
    ("AnchorDeltaX", LayoutField::AnchorDeltaX),
    ("AnchorDeltaY", LayoutField::AnchorDeltaY),
    ("IsScaledProportionallyOnX", LayoutField::IsScaledProportionallyOnX),
    ("IsScaledProportionallyOnY", LayoutField::IsScaledProportionallyOnY),
    ("IsScaledProportionallyOnZ", LayoutField::IsScaledProportionallyOnZ),
    ("IsScaledProportionally", LayoutField::IsScaledProportionally),
];

fn layout_field(property_name: &str) -> Option<LayoutField> {
    LAYOUT_FIELDS
        .iter()
        .find(|(keyword, _)| property_name.contains(keyword))
        .map(|(_, field)| *field)
}

fn parse_number(value: &str) -> f32 {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// `left`, `center` or `right`, or the second half of a compound like `top-left`
pub fn proportional_position_x(position_name: &str) -> Option<f32> {
    let name = match position_name.split_once('-') {
        Some((_, horizontal)) => horizontal,
        None => position_name,
    };
    match name.to_lowercase().as_str() {
        "left" => Some(0.0),
        "center" => Some(0.5),
        "right" => Some(1.0),
        _ => None,
    }
}

/// `top`, `center` or `bottom`, or the first half of a compound like `top-left`
pub fn proportional_position_y(position_name: &str) -> Option<f32> {
    let name = match position_name.split_once('-') {
        Some((vertical, _)) => vertical,
        None => position_name,
    };
    match name.to_lowercase().as_str() {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn position(self, name: &str) -> Option<f32> {
        match self {
            Axis::Horizontal => proportional_position_x(name),
            Axis::Vertical => proportional_position_y(name),
        }
    }

    /// Half of a compound name (`top-left`) concerning this axis
    fn half(self, name: &str) -> &str {
        match (self, name.split_once('-')) {
            (Axis::Horizontal, Some((_, horizontal))) => horizontal,
            (Axis::Vertical, Some((vertical, _))) => vertical,
            (_, None) => name,
        }
    }

    fn layout(self, layout: &mut ChildLayout) -> &mut AxisLayout {
        match self {
            Axis::Horizontal => &mut layout.horizontal_layout,
            Axis::Vertical => &mut layout.vertical_layout,
        }
    }
}

/// A position name, or the name of another property holding a position name
fn anchor_value(axis: Axis, value: &str, values: &HashMap<String, String>) -> Option<f32> {
    axis.position(value).or_else(|| {
        values
            .get(value)
            .and_then(|referenced| axis.position(referenced))
    })
}

/// Like [`anchor_value`], plus `same` and `opposite` relative to the target value
fn origin_anchor_value(
    axis: Axis,
    value: &str,
    values: &HashMap<String, String>,
    target: Option<f32>,
) -> Option<f32> {
    let name = axis.half(value);
    match (name.to_lowercase().as_str(), target) {
        ("same", target) => target,
        ("opposite", Some(target)) => Some(1.0 - target),
        _ => anchor_value(axis, name, values),
    }
}

fn edge_anchor(value: &str) -> Option<EdgeAnchor> {
    match value.trim().to_lowercase().as_str() {
        "min" | "left" | "top" | "1" => Some(EdgeAnchor::MinEdge),
        "max" | "right" | "bottom" | "2" => Some(EdgeAnchor::MaxEdge),
        "proportional" | "3" => Some(EdgeAnchor::Proportional),
        "center" | "4" => Some(EdgeAnchor::Center),
        _ => None,
    }
}

/// Anchor target read from the `*AnchorTarget` property paired with an origin property
#[derive(Debug, Default)]
struct AnchorTarget {
    object: Option<String>,
    horizontal: Option<f32>,
    vertical: Option<f32>,
}

fn anchor_target(
    origin_name: &str,
    field: LayoutField,
    descriptors: &[LayoutPropertyDescriptor],
    values: &HashMap<String, String>,
) -> AnchorTarget {
    let target_name = origin_name.replace("AnchorOrigin", "AnchorTarget");
    let Some(descriptor) = descriptors.iter().find(|d| d.name == target_name) else {
        debug!("No {} property for {}", target_name, origin_name);
        return AnchorTarget::default();
    };
    let value = values.get(&target_name).map(String::as_str).unwrap_or("");
    let read = |axis| anchor_value(axis, value, values).unwrap_or_else(|| parse_number(value));
    AnchorTarget {
        object: descriptor.extra_info.first().cloned(),
        horizontal: (field != LayoutField::VerticalAnchorOrigin).then(|| read(Axis::Horizontal)),
        vertical: (field != LayoutField::HorizontalAnchorOrigin).then(|| read(Axis::Vertical)),
    }
}

/// Build the layout of each child from the property declarations and values.
///
/// Properties without children or without a layout keyword are ignored.
/// Missing values are read as empty strings.
pub fn child_layouts_from_properties(
    descriptors: &[LayoutPropertyDescriptor],
    values: &HashMap<String, String>,
) -> HashMap<String, ChildLayout> {
    let mut layouts: HashMap<String, ChildLayout> = HashMap::new();

    for descriptor in descriptors {
        if descriptor.extra_info.is_empty() {
            continue;
        }
        let Some(field) = layout_field(&descriptor.name) else {
            continue;
        };
        if matches!(
            field,
            LayoutField::HorizontalAnchorTarget
                | LayoutField::VerticalAnchorTarget
                | LayoutField::AnchorTarget
        ) {
            // Read along with the origin property
            continue;
        }

        let value = values
            .get(&descriptor.name)
            .map(String::as_str)
            .unwrap_or("");
        let number = parse_number(value);
        let boolean = value == "true";
        let target = match field {
            LayoutField::HorizontalAnchorOrigin
            | LayoutField::VerticalAnchorOrigin
            | LayoutField::AnchorOrigin => {
                Some(anchor_target(&descriptor.name, field, descriptors, values))
            }
            _ => None,
        };

        for child_name in &descriptor.extra_info {
            let layout = layouts.entry(child_name.clone()).or_default();
            match field {
                LayoutField::Show => {
                    if !boolean {
                        layout.is_shown = false;
                    }
                }
                LayoutField::LeftPadding => {
                    layout.horizontal_layout.min_side_absolute_margin = Some(number)
                }
                LayoutField::RightPadding => {
                    layout.horizontal_layout.max_side_absolute_margin = Some(number)
                }
                LayoutField::TopPadding => {
                    layout.vertical_layout.min_side_absolute_margin = Some(number)
                }
                LayoutField::BottomPadding => {
                    layout.vertical_layout.max_side_absolute_margin = Some(number)
                }
                LayoutField::LeftEdgeAnchor => {
                    layout.horizontal_layout.min_edge_anchor = edge_anchor(value)
                }
                LayoutField::RightEdgeAnchor => {
                    layout.horizontal_layout.max_edge_anchor = edge_anchor(value)
                }
                LayoutField::TopEdgeAnchor => {
                    layout.vertical_layout.min_edge_anchor = edge_anchor(value)
                }
                LayoutField::BottomEdgeAnchor => {
                    layout.vertical_layout.max_edge_anchor = edge_anchor(value)
                }
                LayoutField::AnchorDeltaX => layout.horizontal_layout.anchor_delta = Some(number),
                LayoutField::AnchorDeltaY => layout.vertical_layout.anchor_delta = Some(number),
                LayoutField::IsScaledProportionallyOnX => {
                    layout.horizontal_layout.is_scaled_proportionally = boolean
                }
                LayoutField::IsScaledProportionallyOnY => {
                    layout.vertical_layout.is_scaled_proportionally = boolean
                }
                LayoutField::IsScaledProportionallyOnZ => {
                    layout.depth_layout.is_scaled_proportionally = boolean
                }
                LayoutField::IsScaledProportionally => {
                    layout.horizontal_layout.is_scaled_proportionally = boolean;
                    layout.vertical_layout.is_scaled_proportionally = boolean;
                    layout.depth_layout.is_scaled_proportionally = boolean;
                }
                LayoutField::HorizontalAnchorOrigin
                | LayoutField::VerticalAnchorOrigin
                | LayoutField::AnchorOrigin => {
                    let Some(target) = target.as_ref() else {
                        continue;
                    };
                    let mut axes = Vec::with_capacity(2);
                    if field != LayoutField::VerticalAnchorOrigin {
                        axes.push((Axis::Horizontal, target.horizontal));
                    }
                    if field != LayoutField::HorizontalAnchorOrigin {
                        axes.push((Axis::Vertical, target.vertical));
                    }
                    for (axis, target_value) in axes {
                        let origin = origin_anchor_value(axis, value, values, target_value)
                            .unwrap_or(number);
                        let axis_layout = axis.layout(layout);
                        axis_layout.anchor_origin = Some(origin);
                        if target_value.is_some() {
                            axis_layout.anchor_target = target_value;
                        }
                        axis_layout.anchor_target_object = target.object.clone();
                    }
                }
                LayoutField::HorizontalAnchorTarget
                | LayoutField::VerticalAnchorTarget
                | LayoutField::AnchorTarget => {}
            }
        }
    }
    layouts
}
