use crate::error::NavigatorResult;
use crate::plot::PlotDocument;
use smallvec::SmallVec;
use std::fmt;
use tracing::debug;

/// Kind of continuous edit an undo transaction covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UndoCategory {
    AxisMove,
    InRange,
    Camera,
    Parameter(String),
}

impl fmt::Display for UndoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoCategory::AxisMove => write!(f, "axis move"),
            UndoCategory::InRange => write!(f, "in-range view"),
            UndoCategory::Camera => write!(f, "camera"),
            UndoCategory::Parameter(name) => write!(f, "parameter {name}"),
        }
    }
}

/// Collapses the many small mutations of one gesture into one undo step per category.
///
/// The first edit of a category inside a gesture asks the document for a transaction; later
/// edits of the same category coalesce into it. A gesture ends explicitly (button or key
/// release, failed edit) or after `timeout` seconds without any edit, which covers wheel and
/// trackpad input that has no release event.
#[derive(Debug, Clone)]
pub struct EditGate {
    open: SmallVec<[UndoCategory; 4]>,
    last_edit: Option<f64>,
    timeout: f64,
}

impl EditGate {
    pub fn new(timeout: f64) -> Self {
        Self { open: SmallVec::new(), last_edit: None, timeout: timeout.max(0.0) }
    }

    pub fn is_open(&self, category: &UndoCategory) -> bool {
        self.open.contains(category)
    }

    pub fn in_gesture(&self) -> bool {
        !self.open.is_empty()
    }

    /// Opens a transaction for `category` unless the current gesture already holds one.
    pub fn begin<D: PlotDocument + ?Sized>(&mut self, doc: &mut D, category: UndoCategory, now: f64) {
        if let Some(last) = self.last_edit {
            if now - last > self.timeout {
                self.end_gesture();
            }
        }
        self.last_edit = Some(now);
        if self.open.contains(&category) {
            return;
        }
        debug!(%category, "undo transaction opened");
        doc.begin_transaction(&category);
        self.open.push(category);
    }

    /// Runs a fallible edit inside `category`'s transaction. A failed edit ends the gesture so the
    /// next attempt starts a fresh transaction.
    pub fn scoped<D, T, F>(&mut self, doc: &mut D, category: UndoCategory, now: f64, edit: F) -> NavigatorResult<T>
    where
        D: PlotDocument + ?Sized,
        F: FnOnce(&mut D) -> NavigatorResult<T>,
    {
        self.begin(doc, category, now);
        let result = edit(doc);
        if result.is_err() {
            self.end_gesture();
        }
        result
    }

    pub fn end_gesture(&mut self) {
        if !self.open.is_empty() {
            debug!(count = self.open.len(), "gesture ended");
        }
        self.open.clear();
        self.last_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigatorError;
    use crate::plot::{NavigationModel, Plot};

    #[test]
    fn categories_open_once_per_gesture() {
        let mut plot = Plot::new(NavigationModel::Rect2D);
        let mut gate = EditGate::new(0.5);
        gate.begin(&mut plot, UndoCategory::AxisMove, 0.0);
        gate.begin(&mut plot, UndoCategory::Camera, 0.1);
        gate.begin(&mut plot, UndoCategory::AxisMove, 0.2);
        assert_eq!(plot.transactions, vec![UndoCategory::AxisMove, UndoCategory::Camera]);
        assert!(gate.is_open(&UndoCategory::Camera));

        gate.end_gesture();
        assert!(!gate.in_gesture());
        gate.begin(&mut plot, UndoCategory::AxisMove, 0.3);
        assert_eq!(plot.transactions.len(), 3);
    }

    #[test]
    fn idle_timeout_starts_a_new_gesture() {
        let mut plot = Plot::new(NavigationModel::Rect2D);
        let mut gate = EditGate::new(0.5);
        gate.begin(&mut plot, UndoCategory::InRange, 1.0);
        gate.begin(&mut plot, UndoCategory::InRange, 1.5);
        gate.begin(&mut plot, UndoCategory::InRange, 2.01);
        assert_eq!(plot.transactions.len(), 2);
    }

    #[test]
    fn failed_edit_closes_the_gesture() {
        let mut plot = Plot::new(NavigationModel::Rect2D);
        let mut gate = EditGate::new(0.5);
        let result: NavigatorResult<()> = gate.scoped(&mut plot, UndoCategory::Camera, 0.0, |_| {
            Err(NavigatorError::Recalc { name: "a".into(), reason: "nope".into() })
        });
        assert!(result.is_err());
        assert!(!gate.in_gesture());
        assert_eq!(UndoCategory::Parameter("k".into()).to_string(), "parameter k");
    }
}
