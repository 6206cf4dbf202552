//! Recent-event feed for the HUD.
//!
//! Board events are shown under the names of the sound cues the board would
//! play for them; events without a cue are not shown.

use std::collections::VecDeque;

use crate::types::BoardEvent;

/// Lines kept for display.
pub const FEED_LEN: usize = 6;

/// Cue played for an event, if any.
pub fn cue_for(event: &BoardEvent) -> Option<&'static str> {
    match event {
        BoardEvent::BoardRotate { .. } => Some("rotate"),
        BoardEvent::BoardRotateBlocked => Some("block"),
        BoardEvent::PieceRotate => Some("spin"),
        BoardEvent::PieceDrop => Some("flame"),
        BoardEvent::PieceCommit { .. } => Some("piece"),
        BoardEvent::LineComplete { .. } => Some("line"),
        BoardEvent::TopOut => Some("over"),
        BoardEvent::PieceMove { .. } | BoardEvent::PieceSlide { .. } | BoardEvent::PieceHurry { .. } => {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEntry {
    pub cue: &'static str,
    /// Rows for `line`, bad-move flag for `piece`.
    pub detail: Option<u32>,
    /// Consecutive repeats folded into this entry.
    pub count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    entries: VecDeque<FeedEntry>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &BoardEvent) {
        let Some(cue) = cue_for(event) else {
            return;
        };
        let detail = match *event {
            BoardEvent::LineComplete { rows } => Some(rows),
            BoardEvent::PieceCommit { bad_move, .. } => Some(bad_move as u32),
            _ => None,
        };

        if let Some(last) = self.entries.back_mut() {
            if last.cue == cue && last.detail == detail {
                last.count += 1;
                return;
            }
        }
        if self.entries.len() == FEED_LEN {
            self.entries.pop_front();
        }
        self.entries.push_back(FeedEntry {
            cue,
            detail,
            count: 1,
        });
    }

    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a BoardEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncued_events_are_skipped() {
        let mut feed = EventFeed::new();
        feed.push(&BoardEvent::PieceMove { dx: 1, dy: 0 });
        feed.push(&BoardEvent::PieceHurry { factor: 4 });
        assert!(feed.is_empty());
    }

    #[test]
    fn test_repeats_fold_and_newest_first() {
        let mut feed = EventFeed::new();
        feed.extend(&[
            BoardEvent::PieceRotate,
            BoardEvent::PieceRotate,
            BoardEvent::LineComplete { rows: 2 },
        ]);
        let recent: Vec<_> = feed.recent().collect();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].cue, "line");
        assert_eq!(recent[0].detail, Some(2));
        assert_eq!(recent[1].cue, "spin");
        assert_eq!(recent[1].count, 2);
    }

    #[test]
    fn test_bounded() {
        let mut feed = EventFeed::new();
        for i in 0..20 {
            feed.push(&BoardEvent::LineComplete { rows: i });
        }
        assert_eq!(feed.len(), FEED_LEN);
        assert_eq!(feed.recent().next().map(|e| e.detail), Some(Some(19)));
    }
}
