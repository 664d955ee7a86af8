//! Component trait

/// Marker trait for components
///
/// Components are plain data records. Each entity holds at most one value
/// per component type.
pub trait Component: 'static {}
