//! Anchored layouts for the children of composite objects
//!
//! When a composite object is resized, each of its children is moved and
//! resized according to its `ChildLayout`:
//! - margins to the parent edges, absolute or proportional
//! - edge anchors following the parent or a sibling
//! - anchor points, optionally scaling with the anchor target
//!
//! Layouts are usually read from the object properties with
//! `child_layouts_from_properties`, then applied with `apply_child_layouts`.

mod model;
mod properties;
mod resolver;

pub use model::{AxisLayout, ChildLayout, EdgeAnchor};
pub use properties::{
    child_layouts_from_properties, proportional_position_x, proportional_position_y,
    LayoutPropertyDescriptor,
};
pub use resolver::{apply_child_layouts, LayoutChild, LayoutParent, LayoutedInstance};
