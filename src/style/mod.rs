//! Computed styles: the property registry, value computation, change
//! tracking, the per-parent cache and transitions.

pub mod animation;
pub mod cache;
pub mod change;
pub mod compute;
pub mod computed;
pub mod property;
pub mod value;

pub use change::{ChangeSet, CssChange};
pub use compute::StyleDefaults;
pub use computed::ComputedStyle;
pub use property::PropertyId;
pub use value::{BorderStyle, BoxShadow, BuiltinImage, IconSource, IconTransform, Rgba, StyleValue};
