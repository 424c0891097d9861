//! One mind map session: tree, expansion state, layout and the last snapshot.
//!
//! Expansion changes relayout and recompute synchronously, so the snapshot never lags the
//! visible node set. Scroll and resize only record the new values and schedule a coalesced
//! recomputation that runs on the next [`MindMapView::on_animation_frame`].

use crate::engine;
use crate::layout::{LayoutStyle, RetainedLayout};
use crate::measure::{ContentMetrics, Viewport};
use crate::model::LayoutSnapshot;
use crate::schedule::FrameScheduler;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::Result;
use nagrik_core::{ExpansionState, TreeIndex, TreeNode};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Scroll,
    Resize,
}

#[derive(Clone)]
pub struct MindMapOptions {
    pub style: LayoutStyle,
    pub viewport: Viewport,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        Self {
            style: LayoutStyle::default(),
            viewport: Viewport::default(),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl MindMapOptions {
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }
}

pub struct MindMapView {
    tree: TreeNode,
    expansion: ExpansionState,
    layout: RetainedLayout,
    snapshot: LayoutSnapshot,
    scheduler: FrameScheduler<Trigger>,
    options: MindMapOptions,
    recompute_count: u64,
    torn_down: bool,
}

impl MindMapView {
    pub fn new(tree: TreeNode, options: MindMapOptions) -> Result<Self> {
        let expansion = ExpansionState::new(TreeIndex::build(&tree)?);
        let mut view = Self {
            tree,
            expansion,
            layout: RetainedLayout::default(),
            snapshot: LayoutSnapshot::default(),
            scheduler: FrameScheduler::new(),
            options,
            recompute_count: 0,
            torn_down: false,
        };
        view.relayout_and_recompute();
        Ok(view)
    }

    fn relayout(&mut self) {
        self.layout = RetainedLayout::compute(
            &self.tree,
            &self.expansion,
            &self.options.style,
            self.options.text_measurer.as_ref(),
        );
    }

    fn recompute(&mut self) {
        let metrics = ContentMetrics::new(self.layout.scroll_size(), self.options.viewport);
        self.snapshot = engine::recompute(&self.tree, &self.expansion, &self.layout, &metrics);
        self.recompute_count += 1;
    }

    fn relayout_and_recompute(&mut self) {
        self.relayout();
        self.recompute();
    }

    /// Flips `id` and refreshes geometry before returning. `false` if nothing changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.torn_down || !self.expansion.toggle(id) {
            return false;
        }
        self.relayout_and_recompute();
        true
    }

    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        if self.torn_down || !self.expansion.set_expanded(id, expanded) {
            return false;
        }
        self.relayout_and_recompute();
        true
    }

    /// Applies several overrides with a single relayout. Returns how many were accepted.
    pub fn apply<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a str, bool)>) -> usize {
        if self.torn_down {
            return 0;
        }
        let mut accepted = 0;
        for (id, expanded) in overrides {
            if self.expansion.set_expanded(id, expanded) {
                accepted += 1;
            } else {
                debug!(node = id, "override ignored: node has no toggle");
            }
        }
        if accepted > 0 {
            self.relayout_and_recompute();
        }
        accepted
    }

    pub fn reset(&mut self) {
        if self.torn_down {
            return;
        }
        self.expansion.reset();
        self.relayout_and_recompute();
    }

    pub fn on_scroll(&mut self, x: f64, y: f64) {
        if self.torn_down {
            return;
        }
        self.options.viewport.scroll_x = x;
        self.options.viewport.scroll_y = y;
        self.scheduler.schedule(Trigger::Scroll);
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        if self.torn_down {
            return;
        }
        self.options.viewport.width = width;
        self.options.viewport.height = height;
        self.scheduler.schedule(Trigger::Resize);
    }

    /// Runs at most one recomputation for everything scheduled since the last frame.
    pub fn on_animation_frame(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let due = self.scheduler.take_due();
        if due.is_empty() {
            return false;
        }
        debug!(?due, "coalesced recomputation");
        self.recompute();
        true
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Cancels pending work; later triggers are ignored.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    pub fn layout(&self) -> &RetainedLayout {
        &self.layout
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn viewport(&self) -> Viewport {
        self.options.viewport
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.options.style
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}
