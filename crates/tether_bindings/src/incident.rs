//! Record of absorbed failures
//!
//! Adapters never surface errors to the host; a broken widget degrades to a
//! default value instead. Every degradation is logged and also kept here so
//! it stays observable.

use std::collections::VecDeque;
use std::fmt;

use tether_core::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    /// A data attribute could not be decoded; a default was used
    MalformedInitialValue,
    /// A host value was coerced to the kind's default
    InvalidValue,
    AttachFailed,
    ReadFailed,
    WriteFailed,
    SubscribeFailed,
    LabelFailed,
    /// An inbound message carried a field this kind ignores
    UnhandledField,
    /// An operation ran against an element with no widget state
    Detached,
}

impl IncidentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedInitialValue => "malformed_initial_value",
            Self::InvalidValue => "invalid_value",
            Self::AttachFailed => "attach_failed",
            Self::ReadFailed => "read_failed",
            Self::WriteFailed => "write_failed",
            Self::SubscribeFailed => "subscribe_failed",
            Self::LabelFailed => "label_failed",
            Self::UnhandledField => "unhandled_field",
            Self::Detached => "detached",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub node: NodeId,
    pub element_id: String,
    pub kind: IncidentKind,
    pub detail: String,
}

/// Bounded incident history, oldest entries dropped first
#[derive(Debug, Clone)]
pub struct IncidentLog {
    entries: VecDeque<Incident>,
    capacity: usize,
    dropped: u64,
}

impl IncidentLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, incident: Incident) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(incident);
    }

    pub fn snapshot(&self) -> Vec<Incident> {
        self.entries.iter().cloned().collect()
    }

    pub fn count(&self, kind: IncidentKind) -> usize {
        self.entries.iter().filter(|i| i.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Incidents evicted since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::dom::{Document, ElementSpec};

    fn incident(node: NodeId, n: usize) -> Incident {
        Incident {
            node,
            element_id: format!("el-{n}"),
            kind: if n % 2 == 0 {
                IncidentKind::ReadFailed
            } else {
                IncidentKind::WriteFailed
            },
            detail: String::new(),
        }
    }

    #[test]
    fn test_log_is_bounded() {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("x")).unwrap();
        let mut log = IncidentLog::new(3);
        for n in 0..5 {
            log.push(incident(node, n));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.dropped(), 2);
        let ids: Vec<_> = log.snapshot().into_iter().map(|i| i.element_id).collect();
        assert_eq!(ids, vec!["el-2", "el-3", "el-4"]);
        assert_eq!(log.count(IncidentKind::ReadFailed), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("x")).unwrap();
        let mut log = IncidentLog::new(0);
        log.push(incident(node, 0));
        assert!(log.is_empty());
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(IncidentKind::AttachFailed.to_string(), "attach_failed");
        assert_eq!(IncidentKind::UnhandledField.as_str(), "unhandled_field");
    }
}
