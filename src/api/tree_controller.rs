use tracing::debug;

use crate::core::{
    RowTree, limit_scroll_top, rows_height, visible_items, visible_rows_and_compensation,
};
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    /// Rebuilds the row tree from the current rows and items, then the
    /// expanded-row projection.
    pub(super) fn rebuild_tree(&mut self) {
        let core = &mut self.core;
        core.tree = RowTree::build(core.rows.values(), core.items.values());
        debug!(
            rows = core.tree.len(),
            items = core.items.len(),
            dropped_items = core.tree.dropped_items(),
            "row tree rebuilt"
        );
        let event = TimelineEvent::TreeRebuilt {
            rows_len: core.tree.len(),
            dropped_items: core.tree.dropped_items(),
        };
        self.refresh_rows_with_parents_expanded();
        self.emit_plugin_event(event);
    }

    pub(super) fn refresh_rows_with_parents_expanded(&mut self) {
        let core = &mut self.core;
        core.rows_with_parents_expanded = core
            .tree
            .rows_with_parents_expanded(core.config.list.row_height);
        core.rows_height = rows_height(&core.rows_with_parents_expanded);
    }

    /// Recomputes the visible row slice, visible items and vertical compensation.
    pub(super) fn refresh_visible_rows(&mut self) {
        let core = &mut self.core;
        let viewport_height = core.config.viewport.rows_height();
        core.config.scroll.top =
            limit_scroll_top(core.rows_height, viewport_height, core.config.scroll.top);
        let visible = visible_rows_and_compensation(
            &core.rows_with_parents_expanded,
            core.config.scroll.top,
            viewport_height,
        );
        core.compensation.y = if core.config.scroll.smooth {
            -visible.compensation
        } else {
            0.0
        };
        let first = visible.range.start;
        let changed = core.visible_rows.publish(visible.rows);
        core.visible_items = visible_items(&core.tree, core.visible_rows.rows())
            .into_iter()
            .cloned()
            .collect();
        if changed {
            let len = core.visible_rows.rows().len();
            self.emit_plugin_event(TimelineEvent::VisibleRowsChanged { first, len });
        }
    }
}
