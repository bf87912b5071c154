use std::collections::{HashMap, VecDeque};

use crate::NodeId;
use crate::capabilities::{FetchFailure, RequestId};
use crate::page::Navigation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchMock {
    pub(crate) body: Result<String, FetchFailure>,
    pub(crate) delay_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlightRequest {
    pub(crate) request: RequestId,
    pub(crate) url: String,
    pub(crate) body: Result<String, FetchFailure>,
    pub(crate) due_at: i64,
    pub(crate) order: u64,
}

#[derive(Debug)]
pub(crate) struct NetworkState {
    pub(crate) fetch_mocks: HashMap<String, FetchMock>,
    pub(crate) fetch_calls: Vec<String>,
    pub(crate) in_flight: Vec<InFlightRequest>,
    pub(crate) next_request_id: u64,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            fetch_mocks: HashMap::new(),
            fetch_calls: Vec::new(),
            in_flight: Vec::new(),
            next_request_id: 1,
        }
    }
}

impl NetworkState {
    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.saturating_add(1);
        RequestId(id)
    }

    /// Index of the earliest response due at or before `now_ms`; ties go to
    /// the request issued first.
    pub(crate) fn next_due(&self, now_ms: i64) -> Option<usize> {
        self.in_flight
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due_at <= now_ms)
            .min_by_key(|(_, pending)| (pending.due_at, pending.order))
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) confirm_messages: Vec<String>,
    pub(crate) confirm_responses: VecDeque<bool>,
    pub(crate) default_confirm_response: bool,
    pub(crate) navigations: Vec<Navigation>,
    pub(crate) scroll_position: (i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingRemoval {
    pub(crate) node: NodeId,
    pub(crate) due_at: i64,
}

#[derive(Debug, Default)]
pub(crate) struct SchedulerState {
    pub(crate) now_ms: i64,
    pub(crate) next_order: u64,
    pub(crate) pending_removals: Vec<PendingRemoval>,
}

impl SchedulerState {
    pub(crate) fn allocate_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Removes and returns the nodes whose transition has finished.
    pub(crate) fn take_due_removals(&mut self) -> Vec<NodeId> {
        let now_ms = self.now_ms;
        let mut due = Vec::new();
        self.pending_removals.retain(|removal| {
            if removal.due_at <= now_ms {
                due.push(removal.node);
                false
            } else {
                true
            }
        });
        due
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) dom: bool,
    pub(crate) network: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            dom: true,
            network: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl TraceState {
    pub(crate) fn push(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        log::debug!(target: "admin_form_kit", "{line}");
        if self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn truncate_to_limit(&mut self) {
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
    }
}
