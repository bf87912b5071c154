use crate::capabilities::{
    Dialogs, DomQuery, FetchFailure, FetchResponse, HttpClient, Navigator, RequestId, Viewport,
};
use crate::dom::Dom;
use crate::html::parse_html;
use crate::runtime_state::{
    FetchMock, InFlightRequest, NetworkState, PendingRemoval, PlatformMockState, SchedulerState,
    TraceState,
};
use crate::validation::{FormControl, InputKind};
use crate::{Error, NodeId, Result};

const FORM_CONTROL_TAGS: [&str; 4] = ["input", "select", "textarea", "button"];

/// A navigation the page performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    pub at_ms: i64,
}

/// Deterministic in-memory host for the form helpers.
///
/// Time only moves through [`Page::advance_time`]. Mocked fetch responses
/// become available once their delay has elapsed, and transitions finish
/// when the clock passes their end.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    network: NetworkState,
    platform_mocks: PlatformMockState,
    scheduler: SchedulerState,
    trace_state: TraceState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            network: NetworkState::default(),
            platform_mocks: PlatformMockState::default(),
            scheduler: SchedulerState::default(),
            trace_state: TraceState::default(),
        })
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_dom(&mut self, enabled: bool) {
        self.trace_state.dom = enabled;
    }

    pub fn set_trace_network(&mut self, enabled: bool) {
        self.trace_state.network = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        self.trace_state.truncate_to_limit();
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub fn set_fetch_mock(&mut self, url: &str, body: &str) {
        self.set_fetch_mock_with_delay(url, body, 0);
    }

    pub fn set_fetch_mock_with_delay(&mut self, url: &str, body: &str, delay_ms: i64) {
        self.network.fetch_mocks.insert(
            url.to_string(),
            FetchMock {
                body: Ok(body.to_string()),
                delay_ms: delay_ms.max(0),
            },
        );
    }

    pub fn set_fetch_failure(&mut self, url: &str, failure: FetchFailure, delay_ms: i64) {
        self.network.fetch_mocks.insert(
            url.to_string(),
            FetchMock {
                body: Err(failure),
                delay_ms: delay_ms.max(0),
            },
        );
    }

    pub fn clear_fetch_mocks(&mut self) {
        self.network.fetch_mocks.clear();
    }

    pub fn take_fetch_calls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.network.fetch_calls)
    }

    /// Requests issued but not yet handed out by `poll_response`.
    pub fn pending_fetch_count(&self) -> usize {
        self.network.in_flight.len()
    }

    pub fn enqueue_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.confirm_responses.push_back(accepted);
    }

    pub fn set_default_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.default_confirm_response = accepted;
    }

    pub fn take_confirm_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.confirm_messages)
    }

    pub fn take_navigations(&mut self) -> Vec<Navigation> {
        std::mem::take(&mut self.platform_mocks.navigations)
    }

    pub fn scroll_position(&self) -> (i64, i64) {
        self.platform_mocks.scroll_position
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        self.scheduler.now_ms = self.scheduler.now_ms.saturating_add(delta_ms);
        let removed = self.run_due_removals()?;
        self.trace_dom_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} removed={removed}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    /// Moves the clock to the point where every in-flight response and
    /// running transition has finished.
    pub fn flush(&mut self) -> Result<()> {
        let last_response = self.network.in_flight.iter().map(|pending| pending.due_at);
        let last_removal = self
            .scheduler
            .pending_removals
            .iter()
            .map(|removal| removal.due_at);
        let target = last_response
            .chain(last_removal)
            .max()
            .unwrap_or(self.scheduler.now_ms);
        self.advance_time((target - self.scheduler.now_ms).max(0))
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_value(target, text)
    }

    pub fn select(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "select") {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "select".into(),
                actual: self.dom.tag_name(target).unwrap_or_default().to_string(),
            });
        }
        self.dom.set_value(target, value)
    }

    pub fn set_checkbox(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_checked(target, checked)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.checked(target)?;
        if actual != expected {
            return Err(self.assertion_failed(
                selector,
                target,
                &expected.to_string(),
                &actual.to_string(),
            ));
        }
        Ok(())
    }

    pub fn assert_has_class(
        &self,
        selector: &str,
        class_name: &str,
        expected: bool,
    ) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name}")
                } else {
                    format!("no class {class_name}")
                }
            };
            return Err(self.assertion_failed(
                selector,
                target,
                &describe(expected),
                &describe(actual),
            ));
        }
        Ok(())
    }

    /// Visible means neither the element nor an ancestor carries `hidden`.
    pub fn assert_visible(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.is_visible(target);
        if actual != expected {
            let describe = |visible: bool| if visible { "visible" } else { "hidden" };
            return Err(self.assertion_failed(
                selector,
                target,
                describe(expected),
                describe(actual),
            ));
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_missing(&self, selector: &str) -> Result<()> {
        match self.select_one(selector) {
            Ok(target) => Err(self.assertion_failed(selector, target, "missing", "present")),
            Err(Error::ElementNotFound(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.outer_html(target)
    }

    pub fn inner_html(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.inner_html(target)
    }

    pub fn document_html(&self) -> String {
        self.dom.dump_node(self.dom.root)
    }

    /// Resolves an `#id` selector. Other selector forms are not supported.
    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        let id = selector
            .trim()
            .strip_prefix('#')
            .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
            .ok_or_else(|| Error::UnsupportedSelector(selector.to_string()))?;
        self.dom
            .by_id(id)
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))
    }

    fn is_visible(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.dom.attr(current, "hidden").is_some() {
                return false;
            }
            cursor = self.dom.parent_element(current);
        }
        true
    }

    fn assertion_failed(
        &self,
        selector: &str,
        target: NodeId,
        expected: &str,
        actual: &str,
    ) -> Error {
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: self.node_snippet(target),
        }
    }

    fn node_snippet(&self, node: NodeId) -> String {
        let html = self.dom.dump_node(node);
        match html.char_indices().nth(200) {
            Some((end, _)) => format!("{}...", &html[..end]),
            None => html,
        }
    }

    fn node_label(&self, node: NodeId) -> String {
        match self.dom.attr(node, "id") {
            Some(id) => format!("#{id}"),
            None => format!("<{}>", self.dom.tag_name(node).unwrap_or("node")),
        }
    }

    fn run_due_removals(&mut self) -> Result<usize> {
        let due = self.scheduler.take_due_removals();
        for node in &due {
            self.detach(*node)?;
        }
        Ok(due.len())
    }

    fn detach(&mut self, node: NodeId) -> Result<()> {
        if !self.dom.is_connected(node) {
            return Ok(());
        }
        self.trace_dom_line(format!("[dom] remove {}", self.node_label(node)));
        self.dom.remove_node(node)
    }

    fn trace_dom_line(&mut self, line: String) {
        if self.trace_state.dom {
            self.trace_state.push(line);
        }
    }

    fn trace_network_line(&mut self, line: String) {
        if self.trace_state.network {
            self.trace_state.push(line);
        }
    }
}

impl DomQuery for Page {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent_element(node)
    }

    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_add(node, class_name)?;
        self.trace_dom_line(format!(
            "[dom] add_class {} class={class_name}",
            self.node_label(node)
        ));
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_remove(node, class_name)?;
        self.trace_dom_line(format!(
            "[dom] remove_class {} class={class_name}",
            self.node_label(node)
        ));
        Ok(())
    }

    fn has_class(&self, node: NodeId, class_name: &str) -> Result<bool> {
        self.dom.class_contains(node, class_name)
    }

    fn value(&self, node: NodeId) -> Result<String> {
        self.dom.value(node)
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.dom.set_value(node, value)?;
        self.trace_dom_line(format!(
            "[dom] set_value {} value={value:?}",
            self.node_label(node)
        ));
        Ok(())
    }

    fn descendant_inputs(&self, container: NodeId) -> Vec<NodeId> {
        self.dom.descendants_by_tag(container, "input")
    }

    fn input_type(&self, node: NodeId) -> Result<String> {
        if self.dom.element(node).is_none() {
            return Err(Error::TypeMismatch {
                target: "input type target".into(),
                expected: "element".into(),
                actual: "non-element".into(),
            });
        }
        Ok(self
            .dom
            .attr(node, "type")
            .map(|kind| kind.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string()))
    }

    fn checked(&self, node: NodeId) -> Result<bool> {
        self.dom.checked(node)
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<()> {
        self.dom.set_checked(node, checked)?;
        self.trace_dom_line(format!(
            "[dom] set_checked {} checked={checked}",
            self.node_label(node)
        ));
        Ok(())
    }

    fn form_controls(&self, form: NodeId) -> Result<Vec<FormControl>> {
        let mut elements = Vec::new();
        self.dom.collect_elements_dfs(form, &mut elements);

        let mut controls = Vec::new();
        for node in elements {
            let Some(tag) = self.dom.tag_name(node) else {
                continue;
            };
            if !FORM_CONTROL_TAGS
                .iter()
                .any(|control| tag.eq_ignore_ascii_case(control))
            {
                continue;
            }
            let input_type = self.dom.attr(node, "type");
            let multiple = self.dom.attr(node, "multiple").is_some();
            let kind = InputKind::classify(tag, input_type.as_deref(), multiple);
            let id = self.dom.attr(node, "id").unwrap_or_default();
            controls.push(FormControl::new(&id, kind, &self.dom.value(node)?));
        }
        Ok(controls)
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.dom.set_inner_html(node, html)?;
        self.trace_dom_line(format!(
            "[dom] set_inner_html {} bytes={}",
            self.node_label(node),
            html.len()
        ));
        Ok(())
    }

    fn insert_html_before(&mut self, node: NodeId, html: &str) -> Result<Vec<NodeId>> {
        let inserted = self.dom.insert_html_before(node, html)?;
        self.trace_dom_line(format!(
            "[dom] insert_before {} nodes={}",
            self.node_label(node),
            inserted.len()
        ));
        Ok(inserted)
    }

    fn remove_with_transition(&mut self, node: NodeId, duration_ms: u32) -> Result<()> {
        if duration_ms == 0 {
            return self.detach(node);
        }
        let due_at = self.scheduler.now_ms.saturating_add(i64::from(duration_ms));
        self.scheduler
            .pending_removals
            .push(PendingRemoval { node, due_at });
        self.trace_dom_line(format!(
            "[dom] fade_out {} duration_ms={duration_ms} due_at={due_at}",
            self.node_label(node)
        ));
        Ok(())
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<()> {
        if visible {
            self.dom.remove_attr(node, "hidden")?;
        } else {
            self.dom.set_attr(node, "hidden", "")?;
        }
        self.trace_dom_line(format!(
            "[dom] set_visible {} visible={visible}",
            self.node_label(node)
        ));
        Ok(())
    }
}

impl Dialogs for Page {
    fn confirm(&mut self, message: &str) -> bool {
        self.platform_mocks
            .confirm_messages
            .push(message.to_string());
        let accepted = self
            .platform_mocks
            .confirm_responses
            .pop_front()
            .unwrap_or(self.platform_mocks.default_confirm_response);
        self.trace_dom_line(format!("[dialog] confirm {message:?} accepted={accepted}"));
        accepted
    }
}

impl Navigator for Page {
    fn navigate(&mut self, destination: &str) {
        let at_ms = self.scheduler.now_ms;
        self.platform_mocks.navigations.push(Navigation {
            to: destination.to_string(),
            at_ms,
        });
        self.trace_dom_line(format!("[navigation] to={destination} at_ms={at_ms}"));
    }
}

impl Viewport for Page {
    fn scroll_to(&mut self, x: i64, y: i64) {
        self.platform_mocks.scroll_position = (x, y);
    }
}

impl HttpClient for Page {
    fn begin_get(&mut self, url: &str) -> RequestId {
        let request = self.network.allocate_request_id();
        self.network.fetch_calls.push(url.to_string());

        let mock = self.network.fetch_mocks.get(url).cloned().unwrap_or(FetchMock {
            body: Err(FetchFailure::Network(format!("no fetch mock for {url}"))),
            delay_ms: 0,
        });
        let due_at = self.scheduler.now_ms.saturating_add(mock.delay_ms);
        let order = self.scheduler.allocate_order();
        self.network.in_flight.push(InFlightRequest {
            request,
            url: url.to_string(),
            body: mock.body,
            due_at,
            order,
        });
        self.trace_network_line(format!("[fetch] GET {url} request={request} due_at={due_at}"));
        request
    }

    fn poll_response(&mut self) -> Option<FetchResponse> {
        let index = self.network.next_due(self.scheduler.now_ms)?;
        let pending = self.network.in_flight.remove(index);
        let status = match &pending.body {
            Ok(_) => "ok".to_string(),
            Err(failure) => failure.to_string(),
        };
        self.trace_network_line(format!(
            "[fetch] response {} request={} {status}",
            pending.url, pending.request
        ));
        Some(FetchResponse {
            request: pending.request,
            url: pending.url,
            body: pending.body,
        })
    }
}
