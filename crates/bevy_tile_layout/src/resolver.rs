//! Anchored layout of the children of a resized composite object

use std::collections::HashMap;

use bevy_log::debug;
use bevy_math::Vec3;
use bevy_tile_core::{ChildInstance, InstanceGeometry};

use crate::model::{AxisLayout, ChildLayout};

/// The composite object whose children are laid out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParent {
    /// Size the children were authored for
    pub initial_size: Vec3,
    /// Current size of the object
    pub current_size: Vec3,
    /// Only 3D objects lay out their children on the depth axis
    pub is_3d: bool,
}

impl LayoutParent {
    pub fn new_2d(initial_width: f32, initial_height: f32, width: f32, height: f32) -> Self {
        Self {
            initial_size: Vec3::new(initial_width, initial_height, 0.0),
            current_size: Vec3::new(width, height, 0.0),
            is_3d: false,
        }
    }

    pub fn new_3d(initial_size: Vec3, current_size: Vec3) -> Self {
        Self {
            initial_size,
            current_size,
            is_3d: true,
        }
    }
}

/// A child object, as authored inside the composite object
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutChild {
    pub name: String,
    pub authored: ChildInstance,
    /// Size of the object when the instance has no custom size
    pub default_size: Vec3,
}

impl LayoutChild {
    pub fn new(name: impl Into<String>, authored: ChildInstance, default_size: Vec3) -> Self {
        Self {
            name: name.into(),
            authored,
            default_size,
        }
    }

    /// Authored position and size (custom size, or the default size)
    pub fn authored_box(&self) -> (Vec3, Vec3) {
        let instance = &self.authored;
        let (width, height) = if instance.has_custom_size() {
            (instance.custom_width(), instance.custom_height())
        } else {
            (self.default_size.x, self.default_size.y)
        };
        let depth = if instance.has_custom_depth() {
            instance.custom_depth()
        } else {
            self.default_size.z
        };
        (
            Vec3::new(instance.x(), instance.y(), instance.z()),
            Vec3::new(width, height, depth),
        )
    }
}

/// Position and size of a child for one layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutedInstance {
    pub name: String,
    /// Hidden children are laid out but must not be rendered
    pub is_shown: bool,
    pub position: Vec3,
    pub size: Vec3,
}

impl LayoutedInstance {
    /// Write the layout to an instance, the size becoming its custom size
    pub fn apply_to(&self, instance: &mut impl InstanceGeometry) {
        instance.set_x(self.position.x);
        instance.set_y(self.position.y);
        instance.set_z(self.position.z);
        instance.set_custom_width(self.size.x);
        instance.set_custom_height(self.size.y);
        instance.set_custom_depth(self.size.z);
    }

    /// A render proxy holding the layout
    pub fn to_child_instance(&self) -> ChildInstance {
        let mut instance = ChildInstance::default();
        self.apply_to(&mut instance);
        instance
    }
}

/// One axis of a box
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    min: f32,
    size: f32,
}

impl Span {
    fn max(self) -> f32 {
        self.min + self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolution {
    Pending,
    InProgress,
    Done { position: Vec3, size: Vec3 },
}

/// Lays out children on demand, so that anchor targets are laid out before
/// the children anchored to them.
struct Resolver<'a> {
    parent: &'a LayoutParent,
    children: &'a [LayoutChild],
    layouts: Vec<&'a ChildLayout>,
    by_name: HashMap<&'a str, usize>,
    resolutions: Vec<Resolution>,
}

impl<'a> Resolver<'a> {
    fn new(
        parent: &'a LayoutParent,
        children: &'a [LayoutChild],
        layouts: &'a HashMap<String, ChildLayout>,
        not_anchored: &'a ChildLayout,
    ) -> Self {
        let mut by_name = HashMap::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            by_name.entry(child.name.as_str()).or_insert(index);
        }
        Self {
            parent,
            children,
            layouts: children
                .iter()
                .map(|child| layouts.get(&child.name).unwrap_or(not_anchored))
                .collect(),
            by_name,
            resolutions: vec![Resolution::Pending; children.len()],
        }
    }

    fn resolve(&mut self, index: usize) -> (Vec3, Vec3) {
        if let Resolution::Done { position, size } = self.resolutions[index] {
            return (position, size);
        }
        self.resolutions[index] = Resolution::InProgress;

        let layout = self.layouts[index];
        let (authored_position, authored_size) = self.children[index].authored_box();
        let mut position = authored_position;
        let mut size = authored_size;
        for axis in 0..3 {
            if axis == 2 && !self.parent.is_3d {
                position.z = 0.0;
                continue;
            }
            if let Some((axis_position, axis_size)) = self.resolve_axis(
                layout.axis(axis),
                axis,
                authored_position[axis],
                authored_size[axis],
            ) {
                position[axis] = axis_position;
                size[axis] = axis_size;
            }
        }

        self.resolutions[index] = Resolution::Done { position, size };
        (position, size)
    }

    /// Initial and current span of an anchor target on an axis
    fn target_spans(&mut self, target: Option<&str>, axis: usize) -> (Span, Span) {
        let parent = (
            Span {
                min: 0.0,
                size: self.parent.initial_size[axis],
            },
            Span {
                min: 0.0,
                size: self.parent.current_size[axis],
            },
        );
        let Some(name) = target else {
            return parent;
        };
        let Some(&index) = self.by_name.get(name) else {
            debug!("Unknown anchor target {}, anchoring to the parent", name);
            return parent;
        };
        if self.resolutions[index] == Resolution::InProgress {
            debug!("Anchor cycle through {}, anchoring to the parent", name);
            return parent;
        }
        let (position, size) = self.resolve(index);
        let (initial_position, initial_size) = self.children[index].authored_box();
        (
            Span {
                min: initial_position[axis],
                size: initial_size[axis],
            },
            Span {
                min: position[axis],
                size: size[axis],
            },
        )
    }

    /// New position and size on an axis, `None` to keep the authored ones
    fn resolve_axis(
        &mut self,
        layout: &AxisLayout,
        axis: usize,
        position: f32,
        size: f32,
    ) -> Option<(f32, f32)> {
        let initial_size = self.parent.initial_size[axis];
        let current_size = self.parent.current_size[axis];
        if !layout.is_configured() || current_size == initial_size || initial_size <= 0.0 {
            return None;
        }

        let parent = Span {
            min: 0.0,
            size: current_size,
        };
        let (target_initial, target) = self.target_spans(layout.target_object(), axis);
        let scale = if target_initial.size == 0.0 {
            1.0
        } else {
            target.size / target_initial.size
        };

        if let Some(origin) = layout.anchor_origin {
            let size = if layout.is_scaled_proportionally {
                size * scale
            } else {
                size
            };
            let position = target.min + layout.anchor_target.unwrap_or(0.0) * target.size
                - origin * size
                + layout.anchor_delta.unwrap_or(0.0);
            return Some((position, size));
        }

        if layout.is_scaled_proportionally {
            return Some((
                target.min + (position - target_initial.min) * scale,
                size * scale,
            ));
        }

        let min_edge = layout
            .min_side_absolute_margin
            .map(|margin| parent.min + margin)
            .or_else(|| {
                layout
                    .min_side_proportional_margin
                    .map(|factor| parent.min + factor * parent.size)
            })
            .or_else(|| {
                layout.min_edge_anchor.map(|anchor| {
                    anchor.resolve(position, target_initial.min, target_initial.size, target.min, target.size)
                })
            });
        let max_edge = layout
            .max_side_absolute_margin
            .map(|margin| parent.max() - margin)
            .or_else(|| {
                layout
                    .max_side_proportional_margin
                    .map(|factor| parent.max() - factor * parent.size)
            })
            .or_else(|| {
                layout.max_edge_anchor.map(|anchor| {
                    anchor.resolve(
                        position + size,
                        target_initial.min,
                        target_initial.size,
                        target.min,
                        target.size,
                    )
                })
            });

        Some(match (min_edge, max_edge) {
            (Some(min), Some(max)) => (min, max - min),
            (Some(min), None) => (min, size),
            (None, Some(max)) => (max - size, size),
            (None, None) => (position, size),
        })
    }
}

/// Lay out every child of `parent` according to the layouts keyed by child name.
///
/// Children without a layout keep their authored geometry. Results come in
/// the order of `children`; authored instances are never modified.
pub fn apply_child_layouts(
    parent: &LayoutParent,
    children: &[LayoutChild],
    layouts: &HashMap<String, ChildLayout>,
) -> Vec<LayoutedInstance> {
    let not_anchored = ChildLayout::default();
    let mut resolver = Resolver::new(parent, children, layouts, &not_anchored);
    (0..children.len())
        .map(|index| {
            let (position, size) = resolver.resolve(index);
            LayoutedInstance {
                name: children[index].name.clone(),
                is_shown: resolver.layouts[index].is_shown,
                position,
                size,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeAnchor;

    fn margins(left: f32, right: f32, top: f32, bottom: f32) -> ChildLayout {
        ChildLayout {
            horizontal_layout: AxisLayout {
                min_side_absolute_margin: Some(left),
                max_side_absolute_margin: Some(right),
                ..Default::default()
            },
            vertical_layout: AxisLayout {
                min_side_absolute_margin: Some(top),
                max_side_absolute_margin: Some(bottom),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn anchored(target: &str, origin: (f32, f32), anchor: (f32, f32), scaled: bool) -> ChildLayout {
        let axis = |origin, anchor| AxisLayout {
            anchor_origin: Some(origin),
            anchor_target: Some(anchor),
            anchor_target_object: Some(target.to_string()),
            is_scaled_proportionally: scaled,
            ..Default::default()
        };
        ChildLayout {
            horizontal_layout: axis(origin.0, anchor.0),
            vertical_layout: axis(origin.1, anchor.1),
            ..Default::default()
        }
    }

    fn child(name: &str, default_width: f32, default_height: f32) -> LayoutChild {
        LayoutChild::new(
            name,
            ChildInstance::default(),
            Vec3::new(default_width, default_height, 0.0),
        )
    }

    fn layouts(entries: Vec<(&str, ChildLayout)>) -> HashMap<String, ChildLayout> {
        entries
            .into_iter()
            .map(|(name, layout)| (name.to_string(), layout))
            .collect()
    }

    #[test]
    fn test_unchanged_parent_passes_through() {
        let parent = LayoutParent::new_2d(100.0, 50.0, 100.0, 50.0);
        let children = vec![
            LayoutChild::new(
                "Panel",
                ChildInstance::new(5.0, 7.0).with_custom_size(20.0, 10.0),
                Vec3::new(1.0, 1.0, 0.0),
            ),
            LayoutChild::new("Thumb", ChildInstance::new(3.0, 4.0), Vec3::new(8.0, 9.0, 0.0)),
        ];
        let layouts = layouts(vec![
            ("Panel", margins(10.0, 20.0, 30.0, 40.0)),
            ("Thumb", anchored("Panel", (0.5, 0.5), (1.0, 0.5), true)),
        ]);
        let result = apply_child_layouts(&parent, &children, &layouts);
        assert_eq!(result[0].position, Vec3::new(5.0, 7.0, 0.0));
        assert_eq!(result[0].size, Vec3::new(20.0, 10.0, 0.0));
        assert_eq!(result[1].position, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(result[1].size, Vec3::new(8.0, 9.0, 0.0));
    }

    #[test]
    fn test_margins_fill_parent() {
        let parent = LayoutParent::new_2d(100.0, 50.0, 200.0, 100.0);
        let children = vec![child("Background", 100.0, 50.0)];
        let layouts = layouts(vec![("Background", margins(10.0, 20.0, 30.0, 40.0))]);
        let result = apply_child_layouts(&parent, &children, &layouts);
        assert_eq!(result[0].position, Vec3::new(10.0, 30.0, 0.0));
        assert_eq!(result[0].size, Vec3::new(170.0, 30.0, 0.0));
    }

    #[test]
    fn test_anchor_to_sibling() {
        let parent = LayoutParent::new_2d(100.0, 50.0, 200.0, 100.0);
        // The anchored child comes first: its target is laid out on demand
        let children = vec![child("Thumb", 50.0, 60.0), child("PanelBar", 100.0, 50.0)];
        let layouts = layouts(vec![
            ("PanelBar", margins(10.0, 20.0, 30.0, 40.0)),
            ("Thumb", anchored("PanelBar", (0.5, 0.5), (1.0, 0.5), false)),
        ]);
        let result = apply_child_layouts(&parent, &children, &layouts);
        assert_eq!(result[0].name, "Thumb");
        // PanelBar spans x in [10, 180] and y in [30, 60]
        assert_eq!(result[0].position, Vec3::new(155.0, 15.0, 0.0));
        assert_eq!(result[0].size, Vec3::new(50.0, 60.0, 0.0));
        assert_eq!(result[1].size, Vec3::new(170.0, 30.0, 0.0));
    }

    #[test]
    fn test_proportional_scaling() {
        let parent = LayoutParent::new_2d(25.0, 50.0, 200.0, 100.0);
        let children = vec![child("Border", 25.0, 50.0), child("Thumb", 10.0, 15.0)];
        let layouts = layouts(vec![
            ("Border", margins(0.0, 0.0, 0.0, 0.0)),
            ("Thumb", anchored("Border", (0.5, 0.5), (0.5, 0.5), true)),
        ]);
        let result = apply_child_layouts(&parent, &children, &layouts);
        assert_eq!(result[0].size, Vec3::new(200.0, 100.0, 0.0));
        assert_eq!(result[1].size, Vec3::new(80.0, 30.0, 0.0));
        assert_eq!(result[1].position, Vec3::new(60.0, 35.0, 0.0));
    }

    #[test]
    fn test_single_edge_keeps_size() {
        let parent = LayoutParent::new_2d(100.0, 100.0, 200.0, 100.0);
        let children = vec![LayoutChild::new(
            "Close",
            ChildInstance::new(60.0, 0.0),
            Vec3::new(20.0, 20.0, 0.0),
        )];
        let right_anchored = ChildLayout {
            horizontal_layout: AxisLayout {
                max_edge_anchor: Some(EdgeAnchor::MaxEdge),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = apply_child_layouts(&parent, &children, &layouts(vec![("Close", right_anchored)]));
        assert_eq!(result[0].position.x, 160.0);
        assert_eq!(result[0].size.x, 20.0);

        let proportional = ChildLayout {
            horizontal_layout: AxisLayout {
                min_edge_anchor: Some(EdgeAnchor::Proportional),
                max_edge_anchor: Some(EdgeAnchor::Proportional),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = apply_child_layouts(&parent, &children, &layouts(vec![("Close", proportional)]));
        assert_eq!(result[0].position.x, 120.0);
        assert_eq!(result[0].size.x, 40.0);
    }

    #[test]
    fn test_proportional_margins() {
        let parent = LayoutParent::new_2d(100.0, 100.0, 200.0, 100.0);
        let children = vec![child("Bar", 10.0, 10.0)];
        let layout = ChildLayout {
            horizontal_layout: AxisLayout {
                min_side_proportional_margin: Some(0.25),
                max_side_proportional_margin: Some(0.5),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = apply_child_layouts(&parent, &children, &layouts(vec![("Bar", layout)]));
        assert_eq!(result[0].position.x, 50.0);
        assert_eq!(result[0].size.x, 50.0);
    }

    #[test]
    fn test_cycles_and_unknown_targets_use_parent() {
        let parent = LayoutParent::new_2d(100.0, 100.0, 200.0, 200.0);
        let children = vec![child("A", 10.0, 10.0), child("B", 10.0, 10.0), child("C", 10.0, 10.0)];
        let mut a = anchored("B", (0.0, 0.0), (0.0, 0.0), false);
        a.horizontal_layout.anchor_delta = Some(5.0);
        let mut b = anchored("A", (0.0, 0.0), (0.0, 0.0), false);
        b.horizontal_layout.anchor_delta = Some(7.0);
        let c = anchored("Missing", (1.0, 1.0), (1.0, 1.0), false);
        let result = apply_child_layouts(&parent, &children, &layouts(vec![("A", a), ("B", b), ("C", c)]));
        assert_eq!(result[1].position.x, 7.0);
        assert_eq!(result[0].position.x, 12.0);
        assert_eq!(result[2].position, Vec3::new(190.0, 190.0, 0.0));
    }

    #[test]
    fn test_hidden_children_are_laid_out() {
        let parent = LayoutParent::new_2d(100.0, 50.0, 200.0, 100.0);
        let children = vec![child("Hover", 100.0, 50.0)];
        let mut layout = margins(0.0, 0.0, 0.0, 0.0);
        layout.is_shown = false;
        let result = apply_child_layouts(&parent, &children, &layouts(vec![("Hover", layout)]));
        assert!(!result[0].is_shown);
        assert_eq!(result[0].size, Vec3::new(200.0, 100.0, 0.0));
    }

    #[test]
    fn test_depth_only_for_3d_parents() {
        let depth_margins = ChildLayout {
            depth_layout: AxisLayout {
                min_side_absolute_margin: Some(10.0),
                max_side_absolute_margin: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let children = vec![LayoutChild::new(
            "Box",
            ChildInstance::new(0.0, 0.0).with_z(5.0).with_custom_depth(3.0),
            Vec3::new(10.0, 10.0, 10.0),
        )];
        let layouts = layouts(vec![("Box", depth_margins)]);

        let parent_3d = LayoutParent::new_3d(Vec3::splat(100.0), Vec3::new(100.0, 100.0, 200.0));
        let result = apply_child_layouts(&parent_3d, &children, &layouts);
        assert_eq!(result[0].position.z, 10.0);
        assert_eq!(result[0].size.z, 180.0);

        let parent_2d = LayoutParent::new_2d(100.0, 100.0, 200.0, 200.0);
        let result = apply_child_layouts(&parent_2d, &children, &layouts);
        assert_eq!(result[0].position.z, 0.0);
        assert_eq!(result[0].size.z, 3.0);
    }

    #[test]
    fn test_children_without_layout_keep_authored_geometry() {
        let parent = LayoutParent::new_2d(100.0, 50.0, 200.0, 100.0);
        let children = vec![LayoutChild::new(
            "Label",
            ChildInstance::new(4.0, 2.0),
            Vec3::new(30.0, 12.0, 0.0),
        )];
        let result = apply_child_layouts(&parent, &children, &HashMap::new());
        assert!(result[0].is_shown);
        assert_eq!(result[0].position, Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(result[0].size, Vec3::new(30.0, 12.0, 0.0));
    }

    #[test]
    fn test_apply_to_sets_custom_size() {
        let layouted = LayoutedInstance {
            name: "Thumb".to_string(),
            is_shown: true,
            position: Vec3::new(1.0, 2.0, 0.0),
            size: Vec3::new(30.0, 40.0, 0.0),
        };
        let instance = layouted.to_child_instance();
        assert!(instance.has_custom_size());
        assert_eq!((instance.x, instance.y), (1.0, 2.0));
        assert_eq!(instance.custom_width(), 30.0);
        assert_eq!(instance.custom_height(), 40.0);
    }
}
