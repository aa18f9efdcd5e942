//! src/model/ui_state.rs
//! ============================================================================
//! # `UIState`: presentation-only state
//!
//! Input mode, cursor and viewport, the notification line and the redraw flag.
//! None of it is catalog state; the engine never reads it.

use std::time::Instant;

use compact_str::CompactString;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIMode {
    #[default]
    Browse = 0,
    /// Keystrokes edit the raw search text.
    Search = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss_ms: Option<u32>,
}

#[derive(Debug)]
pub struct UIState {
    pub mode: UIMode,

    /// Index into the visible list.
    pub cursor: usize,

    /// First visible row of the table.
    pub offset: usize,

    /// Table rows that fit on screen, updated on resize.
    pub viewport_height: usize,

    pub notification: Option<Notification>,

    /// Set by any visible change; ratatui redraws the whole frame.
    dirty: bool,
    frame_count: u64,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            mode: UIMode::Browse,
            cursor: 0,
            offset: 0,
            viewport_height: 10,
            notification: None,
            dirty: true,
            frame_count: 0,
        }
    }

    // ---- redraw ---------------------------------------------------------

    #[inline]
    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Marks a frame as drawn.
    pub fn clear_redraw(&mut self) {
        self.dirty = false;
        self.frame_count += 1;
    }

    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ---- mode -----------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.mode = UIMode::Search;
        self.request_redraw();
    }

    pub fn exit_search(&mut self) {
        self.mode = UIMode::Browse;
        self.request_redraw();
    }

    // ---- cursor ---------------------------------------------------------

    pub fn move_up(&mut self, len: usize) {
        self.move_by(-1, len);
    }

    pub fn move_down(&mut self, len: usize) {
        self.move_by(1, len);
    }

    pub fn page_up(&mut self, len: usize) {
        self.move_by(-(self.page() as isize), len);
    }

    pub fn page_down(&mut self, len: usize) {
        self.move_by(self.page() as isize, len);
    }

    /// Keeps the cursor and viewport inside a list of `len` rows.
    pub fn clamp_cursor(&mut self, len: usize) {
        let cursor = self.cursor.min(len.saturating_sub(1));
        if cursor != self.cursor {
            self.cursor = cursor;
            self.request_redraw();
        }
        self.scroll_to_cursor();
    }

    pub fn set_viewport_height(&mut self, rows: usize) {
        self.viewport_height = rows.max(1);
        self.scroll_to_cursor();
        self.request_redraw();
    }

    fn page(&self) -> usize {
        self.viewport_height.max(1)
    }

    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }

        let target = self.cursor.saturating_add_signed(delta).min(len - 1);
        if target != self.cursor {
            self.cursor = target;
            self.scroll_to_cursor();
            self.request_redraw();
        }
    }

    fn scroll_to_cursor(&mut self) {
        let height = self.page();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    // ---- notifications --------------------------------------------------

    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss_ms: Option<u32>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss_ms,
        });
        self.request_redraw();
    }

    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info, Some(3000));
    }

    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success, Some(2000));
    }

    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning, Some(5000));
    }

    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, None);
    }

    pub fn dismiss_notification(&mut self) {
        if self.notification.take().is_some() {
            self.request_redraw();
        }
    }

    /// Drops an expired notification. Returns `true` if one was removed.
    pub fn update_notification(&mut self) -> bool {
        let expired = self.notification.as_ref().is_some_and(|n| {
            n.auto_dismiss_ms
                .is_some_and(|ms| n.timestamp.elapsed().as_millis() > u128::from(ms))
        });

        if expired {
            self.notification = None;
            self.request_redraw();
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut ui = UIState::new();
        ui.move_up(3);
        assert_eq!(ui.cursor, 0);

        ui.move_down(3);
        ui.move_down(3);
        ui.move_down(3);
        assert_eq!(ui.cursor, 2);

        ui.clamp_cursor(1);
        assert_eq!(ui.cursor, 0);

        ui.move_down(0);
        assert_eq!(ui.cursor, 0);
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut ui = UIState::new();
        ui.set_viewport_height(3);

        ui.page_down(12);
        assert_eq!(ui.cursor, 3);
        assert_eq!(ui.offset, 1);

        ui.page_down(12);
        ui.page_down(12);
        ui.page_down(12);
        assert_eq!(ui.cursor, 11);
        assert_eq!(ui.offset, 9);

        ui.page_up(12);
        ui.page_up(12);
        ui.page_up(12);
        ui.page_up(12);
        assert_eq!(ui.cursor, 0);
        assert_eq!(ui.offset, 0);
    }

    #[test]
    fn test_redraw_flag() {
        let mut ui = UIState::new();
        assert!(ui.needs_redraw());
        ui.clear_redraw();
        assert!(!ui.needs_redraw());
        assert_eq!(ui.frame_count(), 1);

        // cursor already at the top: nothing to redraw
        ui.move_up(3);
        assert!(!ui.needs_redraw());

        ui.move_down(3);
        assert!(ui.needs_redraw());
    }

    #[test]
    fn test_error_notification_is_sticky() {
        let mut ui = UIState::new();
        ui.show_error("Could not save favorites");
        assert!(!ui.update_notification());
        assert!(ui.notification.is_some());

        ui.dismiss_notification();
        assert!(ui.notification.is_none());
    }

    #[test]
    fn test_expired_notification_is_dropped() {
        let mut ui = UIState::new();
        ui.show_notification("saved", NotificationLevel::Success, Some(0));
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(ui.update_notification());
        assert!(ui.notification.is_none());
    }
}
