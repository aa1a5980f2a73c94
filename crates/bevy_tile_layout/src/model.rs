//! Declarative layout of the children of a composite object

use serde::{Deserialize, Serialize};

/// How a child edge follows its anchor target when the target is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeAnchor {
    /// Keep the distance to the target min edge (left or top)
    MinEdge,
    /// Keep the distance to the target max edge (right or bottom)
    MaxEdge,
    /// Keep the relative position inside the target
    Proportional,
    /// Keep the distance to the target center
    Center,
}

impl EdgeAnchor {
    /// New position of an edge at `edge` in a target that moved from
    /// `initial_min`/`initial_size` to `min`/`size`.
    pub fn resolve(self, edge: f32, initial_min: f32, initial_size: f32, min: f32, size: f32) -> f32 {
        match self {
            EdgeAnchor::MinEdge => min + (edge - initial_min),
            EdgeAnchor::MaxEdge => min + size - (initial_min + initial_size - edge),
            EdgeAnchor::Proportional => {
                if initial_size == 0.0 {
                    min + (edge - initial_min)
                } else {
                    min + (edge - initial_min) * size / initial_size
                }
            }
            EdgeAnchor::Center => {
                min + size / 2.0 + (edge - (initial_min + initial_size / 2.0))
            }
        }
    }
}

/// Layout of a child along one axis. Every field is optional.
///
/// A child is either placed by its edges (margins or edge anchors) or, when
/// `anchor_origin` is set, by making one of its points follow a point of the
/// anchor target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisLayout {
    /// Point of the child following the target, as a factor of the child size
    /// (0 for left or top, 1 for right or bottom)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_origin: Option<f32>,
    /// Point of the target followed by the child, as a factor of the target size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_target: Option<f32>,
    /// Sibling used as anchor target; the parent when missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_target_object: Option<String>,
    /// Displacement added to the anchored position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_delta: Option<f32>,
    /// Scale the child size with the anchor target
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_scaled_proportionally: bool,
    /// Distance in pixels between the parent min edge and the child min edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_side_absolute_margin: Option<f32>,
    /// Distance in pixels between the child max edge and the parent max edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_side_absolute_margin: Option<f32>,
    /// Min side margin as a factor of the parent size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_side_proportional_margin: Option<f32>,
    /// Max side margin as a factor of the parent size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_side_proportional_margin: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_edge_anchor: Option<EdgeAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_edge_anchor: Option<EdgeAnchor>,
}

impl AxisLayout {
    /// True if the child min edge follows the parent or the anchor target
    pub fn has_min_side(&self) -> bool {
        self.min_side_absolute_margin.is_some()
            || self.min_side_proportional_margin.is_some()
            || self.min_edge_anchor.is_some()
    }

    /// True if the child max edge follows the parent or the anchor target
    pub fn has_max_side(&self) -> bool {
        self.max_side_absolute_margin.is_some()
            || self.max_side_proportional_margin.is_some()
            || self.max_edge_anchor.is_some()
    }

    pub fn is_anchored_by_point(&self) -> bool {
        self.anchor_origin.is_some()
    }

    /// False if the child keeps its authored position and size on this axis
    pub fn is_configured(&self) -> bool {
        self.is_anchored_by_point() || self.has_min_side() || self.has_max_side()
    }

    /// The anchor target sibling, if any (an empty name is the parent)
    pub fn target_object(&self) -> Option<&str> {
        self.anchor_target_object
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Layout of one child object of a composite object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildLayout {
    /// Hidden children are laid out but not rendered
    pub is_shown: bool,
    pub horizontal_layout: AxisLayout,
    pub vertical_layout: AxisLayout,
    pub depth_layout: AxisLayout,
}

impl Default for ChildLayout {
    fn default() -> Self {
        Self {
            is_shown: true,
            horizontal_layout: AxisLayout::default(),
            vertical_layout: AxisLayout::default(),
            depth_layout: AxisLayout::default(),
        }
    }
}

impl ChildLayout {
    /// Layout of an axis: 0 for x, 1 for y, 2 for z
    pub fn axis(&self, axis: usize) -> &AxisLayout {
        match axis {
            0 => &self.horizontal_layout,
            1 => &self.vertical_layout,
            _ => &self.depth_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_anchors() {
        // Target moved from [0, 100] to [50, 250], edge at 30
        assert_eq!(EdgeAnchor::MinEdge.resolve(30.0, 0.0, 100.0, 50.0, 200.0), 80.0);
        assert_eq!(EdgeAnchor::MaxEdge.resolve(30.0, 0.0, 100.0, 50.0, 200.0), 180.0);
        assert_eq!(EdgeAnchor::Proportional.resolve(30.0, 0.0, 100.0, 50.0, 200.0), 110.0);
        assert_eq!(EdgeAnchor::Center.resolve(30.0, 0.0, 100.0, 50.0, 200.0), 130.0);
    }

    #[test]
    fn test_unconfigured_axis() {
        let layout = AxisLayout {
            is_scaled_proportionally: true,
            anchor_target_object: Some(String::new()),
            ..Default::default()
        };
        assert!(!layout.is_configured());
        assert_eq!(layout.target_object(), None);

        let margin = AxisLayout {
            max_side_absolute_margin: Some(0.0),
            ..Default::default()
        };
        assert!(margin.is_configured());
        assert!(!margin.has_min_side());
    }

    #[test]
    fn test_child_layout_json() {
        let layout: ChildLayout = serde_json::from_str(
            r#"{"horizontalLayout":{"minSideAbsoluteMargin":10,"maxEdgeAnchor":"center"}}"#,
        )
        .unwrap();
        assert!(layout.is_shown);
        assert_eq!(layout.horizontal_layout.min_side_absolute_margin, Some(10.0));
        assert_eq!(layout.horizontal_layout.max_edge_anchor, Some(EdgeAnchor::Center));
        assert_eq!(layout.axis(1), &AxisLayout::default());
    }
}
