use async_trait::async_trait;
use formfill_dom::{Document, NodeId};
use formfill_engine::{ReplayDriver, ReplayError};
use std::sync::Mutex;

/// Replays against a static page snapshot. Nothing changes on the page;
/// fills and clicks are recorded so they can be printed.
pub struct SnapshotDriver {
    doc: Document,
    log: Mutex<Vec<String>>,
}

impl SnapshotDriver {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn take_log(&self) -> Vec<String> {
        match self.log.lock() {
            Ok(mut log) => std::mem::take(&mut *log),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn record(&self, line: String) -> Result<(), ReplayError> {
        self.log
            .lock()
            .map_err(|e| ReplayError::Driver(e.to_string()))?
            .push(line);
        Ok(())
    }

    fn describe(&self, id: NodeId) -> String {
        match self.doc.element(id) {
            Some(el) => format!("<{}> #{}", el.tag(), id),
            None => format!("node {}", id),
        }
    }
}

#[async_trait]
impl ReplayDriver for SnapshotDriver {
    type Handle = NodeId;

    async fn find(&self, selector: &str) -> Result<Option<NodeId>, ReplayError> {
        self.doc
            .query_selector(selector)
            .map(|el| el.map(|e| e.id()))
            .map_err(|e| ReplayError::Driver(e.to_string()))
    }

    async fn fill(&self, handle: &NodeId, value: &str) -> Result<(), ReplayError> {
        self.record(format!("fill {} = {:?}", self.describe(*handle), value))
    }

    async fn click(&self, handle: &NodeId) -> Result<(), ReplayError> {
        self.record(format!("click {}", self.describe(*handle)))
    }
}
