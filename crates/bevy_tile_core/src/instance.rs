//! Position and size accessors shared by real instances and layout-only records

/// The geometry capabilities the engines need from a placed instance.
///
/// Implemented by the editor's instance type and by [`ChildInstance`], the
/// lightweight record used for one layout pass.
pub trait InstanceGeometry {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
    fn z(&self) -> f32 {
        0.0
    }
    fn set_x(&mut self, x: f32);
    fn set_y(&mut self, y: f32);
    fn set_z(&mut self, _z: f32) {}

    /// True if the instance overrides the default size of its object
    fn has_custom_size(&self) -> bool;
    fn custom_width(&self) -> f32;
    fn custom_height(&self) -> f32;
    /// Setting a custom dimension enables the custom size
    fn set_custom_width(&mut self, width: f32);
    fn set_custom_height(&mut self, height: f32);

    fn has_custom_depth(&self) -> bool {
        false
    }
    fn custom_depth(&self) -> f32 {
        0.0
    }
    fn set_custom_depth(&mut self, _depth: f32) {}
}

/// A plain position and size record.
///
/// Stands in for an instance of a child object inside a custom object: layout
/// results are written here, never to the authored instance data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChildInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    custom_size: Option<(f32, f32)>,
    custom_depth: Option<f32>,
}

impl ChildInstance {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_custom_size(mut self, width: f32, height: f32) -> Self {
        self.custom_size = Some((width, height));
        self
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_custom_depth(mut self, depth: f32) -> Self {
        self.custom_depth = Some(depth);
        self
    }

    /// Copy the geometry of any instance
    pub fn from_instance(instance: &impl InstanceGeometry) -> Self {
        Self {
            x: instance.x(),
            y: instance.y(),
            z: instance.z(),
            custom_size: instance
                .has_custom_size()
                .then(|| (instance.custom_width(), instance.custom_height())),
            custom_depth: instance
                .has_custom_depth()
                .then(|| instance.custom_depth()),
        }
    }
}

impl InstanceGeometry for ChildInstance {
    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn z(&self) -> f32 {
        self.z
    }

    fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    fn set_z(&mut self, z: f32) {
        self.z = z;
    }

    fn has_custom_size(&self) -> bool {
        self.custom_size.is_some()
    }

    fn custom_width(&self) -> f32 {
        self.custom_size.map(|(w, _)| w).unwrap_or(0.0)
    }

    fn custom_height(&self) -> f32 {
        self.custom_size.map(|(_, h)| h).unwrap_or(0.0)
    }

    fn set_custom_width(&mut self, width: f32) {
        let height = self.custom_height();
        self.custom_size = Some((width, height));
    }

    fn set_custom_height(&mut self, height: f32) {
        let width = self.custom_width();
        self.custom_size = Some((width, height));
    }

    fn has_custom_depth(&self) -> bool {
        self.custom_depth.is_some()
    }

    fn custom_depth(&self) -> f32 {
        self.custom_depth.unwrap_or(0.0)
    }

    fn set_custom_depth(&mut self, depth: f32) {
        self.custom_depth = Some(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_a_dimension_enables_custom_size() {
        let mut instance = ChildInstance::new(1.0, 2.0);
        assert!(!instance.has_custom_size());
        instance.set_custom_width(30.0);
        assert!(instance.has_custom_size());
        assert_eq!(instance.custom_width(), 30.0);
        assert_eq!(instance.custom_height(), 0.0);
    }

    #[test]
    fn test_from_instance_copies_geometry() {
        let source = ChildInstance::new(4.0, 5.0)
            .with_custom_size(10.0, 20.0)
            .with_z(3.0);
        let copy = ChildInstance::from_instance(&source);
        assert_eq!(copy, source);
        assert!(!copy.has_custom_depth());
    }
}
