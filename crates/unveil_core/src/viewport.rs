//! Headless viewport observer
//!
//! A small [`VisibilityObserver`] for hosts without a native intersection
//! primitive: the host places target rectangles, moves the root (scrolling),
//! and calls [`ViewportObserver::update`] once per frame to deliver changes.

use crate::target::TargetId;
use crate::visibility::{
    IntersectionCallback, IntersectionOptions, ObservationId, VisibilityObserver,
};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Axis-aligned rectangle in root coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, if the rectangles share a positive area
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Whether the rectangles overlap or share an edge
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

struct Observation {
    target: TargetId,
    options: IntersectionOptions,
    callback: Rc<RefCell<IntersectionCallback>>,
    /// Last delivered value; `None` until the initial report
    last: Option<bool>,
}

struct ViewportState {
    root: Rect,
    targets: FxHashMap<TargetId, Rect>,
    observations: SlotMap<ObservationId, Observation>,
}

/// Rectangle-overlap observer driven by the host's frame loop
pub struct ViewportObserver {
    state: RefCell<ViewportState>,
}

impl ViewportObserver {
    /// Create an observer whose root (the scrolling viewport) is `root`
    pub fn new(root: Rect) -> Self {
        Self {
            state: RefCell::new(ViewportState {
                root,
                targets: FxHashMap::default(),
                observations: SlotMap::with_key(),
            }),
        }
    }

    pub fn root(&self) -> Rect {
        self.state.borrow().root
    }

    pub fn set_root(&self, root: Rect) {
        self.state.borrow_mut().root = root;
    }

    /// Move the root vertically to `y` (absolute scroll position)
    pub fn scroll_to(&self, y: f32) {
        self.state.borrow_mut().root.y = y;
    }

    /// Place or move a target
    pub fn set_target_rect(&self, target: TargetId, rect: Rect) {
        self.state.borrow_mut().targets.insert(target, rect);
    }

    pub fn remove_target(&self, target: TargetId) {
        self.state.borrow_mut().targets.remove(&target);
    }

    pub fn observation_count(&self) -> usize {
        self.state.borrow().observations.len()
    }

    /// Evaluate a target against the current root. Unplaced targets are
    /// never intersecting.
    pub fn is_intersecting(&self, target: TargetId, options: &IntersectionOptions) -> bool {
        let state = self.state.borrow();
        match state.targets.get(&target) {
            Some(rect) => intersects(&state.root, rect, options),
            None => false,
        }
    }

    /// Deliver every changed intersection state. Returns the number of
    /// callbacks invoked.
    pub fn update(&self) -> usize {
        let pending: Vec<(ObservationId, Rc<RefCell<IntersectionCallback>>, bool)> = {
            let mut state = self.state.borrow_mut();
            let ViewportState {
                root,
                targets,
                observations,
            } = &mut *state;

            observations
                .iter_mut()
                .filter_map(|(id, obs)| {
                    let now = targets
                        .get(&obs.target)
                        .map(|rect| intersects(root, rect, &obs.options))
                        .unwrap_or(false);
                    if obs.last == Some(now) {
                        return None;
                    }
                    obs.last = Some(now);
                    Some((id, obs.callback.clone(), now))
                })
                .collect()
        };

        let mut delivered = 0;
        for (id, callback, is_intersecting) in pending {
            // An earlier callback may have stopped this observation
            if !self.state.borrow().observations.contains_key(id) {
                continue;
            }
            (callback.borrow_mut())(is_intersecting);
            delivered += 1;
        }
        delivered
    }
}

impl VisibilityObserver for ViewportObserver {
    fn observe(
        &self,
        target: TargetId,
        options: IntersectionOptions,
        callback: IntersectionCallback,
    ) -> Option<ObservationId> {
        let id = self.state.borrow_mut().observations.insert(Observation {
            target,
            options,
            callback: Rc::new(RefCell::new(callback)),
            last: None,
        });
        debug!(%target, "viewport observation started");
        Some(id)
    }

    fn unobserve(&self, id: ObservationId) {
        if let Some(obs) = self.state.borrow_mut().observations.remove(id) {
            debug!(target = %obs.target, "viewport observation stopped");
        }
    }
}

fn intersects(root: &Rect, target: &Rect, options: &IntersectionOptions) -> bool {
    let margin = &options.root_margin;
    let top = root.y - margin.top.resolve(root.height);
    let bottom = root.bottom() + margin.bottom.resolve(root.height);
    let left = root.x - margin.left.resolve(root.width);
    let right = root.right() + margin.right.resolve(root.width);
    let bounds = Rect::new(left, top, right - left, bottom - top);

    // Zero-area targets intersect when they lie inside or on the bounds
    let area = target.area();
    if area <= 0.0 {
        return bounds.touches(target);
    }

    let Some(overlap) = bounds.intersection(target) else {
        return false;
    };
    let ratio = overlap.area() / area;
    if options.threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= options.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn viewport() -> ViewportObserver {
        ViewportObserver::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));

        // Touching edges share no area
        let c = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_bottom_margin_requires_extra_overlap() {
        let vp = viewport();
        let target = TargetId::next();
        let options = IntersectionOptions::default();

        // Bottom 5% of 600px = 30px is excluded
        vp.set_target_rect(target, Rect::new(0.0, 580.0, 100.0, 40.0));
        assert!(!vp.is_intersecting(target, &options));

        vp.set_target_rect(target, Rect::new(0.0, 560.0, 100.0, 40.0));
        assert!(vp.is_intersecting(target, &options));

        // Without the margin the first placement would already count
        let plain = IntersectionOptions {
            root_margin: Default::default(),
            ..options
        };
        vp.set_target_rect(target, Rect::new(0.0, 580.0, 100.0, 40.0));
        assert!(vp.is_intersecting(target, &plain));
    }

    #[test]
    fn test_zero_area_target_inside_root_intersects() {
        let vp = viewport();
        let target = TargetId::next();
        let options = IntersectionOptions::default();

        vp.set_target_rect(target, Rect::new(0.0, 100.0, 400.0, 0.0));
        assert!(vp.is_intersecting(target, &options));

        // Inside the root but within the excluded bottom margin
        vp.set_target_rect(target, Rect::new(0.0, 590.0, 400.0, 0.0));
        assert!(!vp.is_intersecting(target, &options));

        vp.set_target_rect(target, Rect::new(0.0, 900.0, 0.0, 0.0));
        assert!(!vp.is_intersecting(target, &options));
    }

    #[test]
    fn test_update_delivers_initial_state_and_changes_only() {
        let vp = viewport();
        let target = TargetId::next();
        vp.set_target_rect(target, Rect::new(0.0, 1000.0, 100.0, 40.0));

        let samples = Rc::new(RefCell::new(Vec::new()));
        let s = samples.clone();
        vp.observe(
            target,
            IntersectionOptions::default(),
            Box::new(move |v| s.borrow_mut().push(v)),
        );

        assert_eq!(vp.update(), 1);
        assert_eq!(vp.update(), 0);

        vp.scroll_to(700.0);
        assert_eq!(vp.update(), 1);

        vp.scroll_to(0.0);
        vp.update();

        assert_eq!(*samples.borrow(), vec![false, true, false]);
    }

    #[test]
    fn test_unobserve_stops_delivery() {
        let vp = viewport();
        let target = TargetId::next();
        vp.set_target_rect(target, Rect::new(0.0, 10.0, 100.0, 40.0));

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = vp
            .observe(
                target,
                IntersectionOptions::default(),
                Box::new(move |_| c.set(c.get() + 1)),
            )
            .unwrap();

        vp.unobserve(id);
        assert_eq!(vp.update(), 0);
        assert_eq!(count.get(), 0);
        assert_eq!(vp.observation_count(), 0);
    }
}
