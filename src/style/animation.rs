//! Property transitions.
//!
//! Animated values depend on the frame time, so they never enter a style
//! cache. A node that is mid-transition keeps its static (base) style here
//! and shows a per-frame interpolation of it.

use std::sync::Arc;

use crate::style::computed::ComputedStyle;
use crate::style::property::PropertyId;
use crate::style::value::StyleValue;

#[derive(Debug, Clone)]
struct Transition {
    property: PropertyId,
    from: StyleValue,
    to: StyleValue,
    start_us: i64,
    duration_us: i64,
}

impl Transition {
    fn progress(&self, now_us: i64) -> f32 {
        if now_us <= self.start_us {
            return 0.0;
        }
        ((now_us - self.start_us) as f64 / self.duration_us as f64).min(1.0) as f32
    }

    fn value_at(&self, now_us: i64) -> StyleValue {
        let t = self.progress(now_us);
        self.from
            .interpolate(&self.to, t)
            .unwrap_or_else(|| self.to.clone())
    }
}

/// Running transitions of one node.
#[derive(Debug, Clone)]
pub struct AnimationState {
    base: Arc<ComputedStyle>,
    transitions: Vec<Transition>,
}

impl AnimationState {
    /// Start transitions from what the node currently shows towards `base`.
    ///
    /// Returns `None` when `base` has no transition duration or no
    /// animatable property differs.
    pub fn start(displayed: &ComputedStyle, base: Arc<ComputedStyle>, now_us: i64) -> Option<Self> {
        let (duration_ms, delay_ms) = base.transition_timing();
        if duration_ms <= 0.0 {
            return None;
        }
        let duration_us = (duration_ms * 1000.0).round() as i64;
        let start_us = now_us + (delay_ms.max(0.0) * 1000.0).round() as i64;

        let transitions: Vec<Transition> = PropertyId::ALL
            .into_iter()
            .filter(|id| id.is_animatable() && displayed.get(*id) != base.get(*id))
            .map(|property| Transition {
                property,
                from: displayed.get(property).clone(),
                to: base.get(property).clone(),
                start_us,
                duration_us: duration_us.max(1),
            })
            .collect();

        if transitions.is_empty() {
            return None;
        }
        log::trace!("starting {} transitions over {duration_ms}ms", transitions.len());
        Some(Self { base, transitions })
    }

    /// The static style the transitions head to.
    pub fn base(&self) -> &Arc<ComputedStyle> {
        &self.base
    }

    /// Keep the running transitions but head to a new, value-equal base.
    pub(crate) fn rebase(&mut self, base: Arc<ComputedStyle>) {
        self.base = base;
    }

    pub fn is_finished(&self, now_us: i64) -> bool {
        self.transitions
            .iter()
            .all(|t| now_us >= t.start_us + t.duration_us)
    }

    /// The style shown at `now_us`.
    pub fn apply(&self, now_us: i64) -> ComputedStyle {
        let mut values = self.base.values().to_vec();
        for transition in &self.transitions {
            values[transition.property.index()] = transition.value_at(now_us);
        }
        self.base.with_animated_values(values)
    }
}
