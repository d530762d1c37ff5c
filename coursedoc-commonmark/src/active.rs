//! Scroll-spy for the documentation page.
//!
//! The browser reports visibility changes of heading anchors; the tracker
//! turns each batch of reports into a single "active" section ID. The
//! rendering surface is abstracted behind [`VisibilityObserver`] so the
//! selection logic runs without a DOM. `main.js` implements the same rule on
//! top of `IntersectionObserver` using [`ObserverOptions::default`].
use serde::{Deserialize, Serialize};

use crate::{navigation::flatten_sections, types::Section};

/// One visibility report for an observed anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
  pub target_id:          String,
  pub is_intersecting:    bool,
  /// Visible fraction of the anchor inside the observed band, `0.0..=1.0`.
  pub intersection_ratio: f64,
}

impl VisibilityEntry {
  #[must_use]
  pub fn new(target_id: &str, is_intersecting: bool, ratio: f64) -> Self {
    Self {
      target_id: target_id.to_string(),
      is_intersecting,
      intersection_ratio: ratio,
    }
  }
}

/// Band of the viewport that counts as "reading position".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
  /// CSS margin applied to the viewport: skips the sticky header at the top
  /// and the bottom 80% of the screen.
  pub root_margin: String,
  /// Ratios at which the observer reports changes.
  pub thresholds:  Vec<f64>,
}

impl Default for ObserverOptions {
  fn default() -> Self {
    Self {
      root_margin: "-100px 0px -80% 0px".to_string(),
      thresholds:  vec![0.0, 0.25, 0.5, 0.75, 1.0],
    }
  }
}

/// Capability to watch anchor elements on some rendering surface.
pub trait VisibilityObserver {
  /// Start observing the element with `id`.
  ///
  /// Returns `false` when no such element is mounted.
  fn observe(&mut self, id: &str) -> bool;

  /// Stop observing everything.
  fn disconnect(&mut self);
}

/// Keeps track of the most prominent visible section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSectionTracker {
  active_id: String,
  options:   ObserverOptions,
}

impl ActiveSectionTracker {
  #[must_use]
  pub fn new(options: ObserverOptions) -> Self {
    Self {
      active_id: String::new(),
      options,
    }
  }

  /// Options the observer should be created with.
  #[must_use]
  pub const fn options(&self) -> &ObserverOptions {
    &self.options
  }

  /// Currently active section ID, empty before the first report.
  #[must_use]
  pub fn active_id(&self) -> &str {
    &self.active_id
  }

  /// Observe the anchor of every section in the tree.
  ///
  /// Sections whose element is not mounted are skipped. Returns the number
  /// of anchors being observed.
  pub fn attach<O: VisibilityObserver + ?Sized>(
    &self,
    observer: &mut O,
    sections: &[Section],
  ) -> usize {
    flatten_sections(sections)
      .into_iter()
      .filter(|section| observer.observe(&section.id))
      .count()
  }

  /// Apply one batch of visibility reports.
  ///
  /// Among the intersecting entries the one with the highest ratio becomes
  /// active; on a tie the earliest entry in the batch wins. A batch without
  /// intersecting entries keeps the previous section active.
  pub fn on_entries(&mut self, entries: &[VisibilityEntry]) -> &str {
    let best = entries
      .iter()
      .filter(|entry| entry.is_intersecting)
      .reduce(|best, entry| {
        if entry.intersection_ratio > best.intersection_ratio {
          entry
        } else {
          best
        }
      });

    if let Some(entry) = best {
      log::trace!("Active section: {}", entry.target_id);
      self.active_id.clone_from(&entry.target_id);
    }

    &self.active_id
  }

  /// Tear the observation down.
  pub fn detach<O: VisibilityObserver + ?Sized>(&self, observer: &mut O) {
    observer.disconnect();
  }
}
