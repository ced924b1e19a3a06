//! # ctk-css
//!
//! CSS styling core for the ctk toolkit: a tree of style nodes parallel to
//! the widget tree, a cascade over pluggable style providers with a
//! per-parent style cache, frame-driven invalidation, and the gadgets that
//! turn computed styles into sizes, allocations and paint.
//!
//! ## Core Systems
//!
//! - **[`node`]**: style nodes, state flags and the node arena
//! - **[`css`]**: tokenizer, parser, selector matching, style providers
//! - **[`style`]**: property registry, computed styles, change sets, cache
//! - **[`engine`]**: the [`StyleEngine`] context, invalidation and the frame clock
//! - **[`gadget`]**: box model, box layout, builtin icons, custom gadgets
//! - **[`render`]**: the display list gadgets draw into
//! - **[`geometry`]**: Region, Spacing and Orientation primitives
//!
//! ## Example
//!
//! ```
//! use ctk_css::{EngineConfig, StateFlags, StyleEngine};
//!
//! let config = EngineConfig::new().with_css("label:hover { color: red; }");
//! let mut engine = StyleEngine::new(config).unwrap();
//! let label = engine.create_node("label");
//! engine.set_state(label, StateFlags::HOVER).unwrap();
//! let style = engine.computed_style(label).unwrap();
//! assert_eq!(style.color(ctk_css::PropertyId::Color).to_string(), "rgb(255,0,0)");
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod geometry;
pub mod intern;

// Styling
pub mod css;
pub mod node;
pub mod style;

// Engine
pub mod engine;

// Layout and paint
pub mod gadget;
pub mod render;

pub use config::EngineConfig;
pub use engine::{FrameStats, Notification, StyleChange, StyleEngine};
pub use error::{Result, StyleError};
pub use gadget::{Align, GadgetId, Measurement, OwnerId, OwnerRequest};
pub use geometry::{Orientation, Region, Spacing};
pub use node::{NodeId, StateFlags};
pub use render::Canvas;
pub use style::change::{ChangeSet, CssChange};
pub use style::computed::ComputedStyle;
pub use style::property::PropertyId;
