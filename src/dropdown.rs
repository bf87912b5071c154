//! Cascading dropdowns: a parent select drives the options of a child select,
//! fetched from the server as an HTML fragment.
//!
//! Loads for the same child are token-guarded. Only the newest request's
//! response is applied, older ones come back as [`LoadOutcome::Stale`]. No
//! timeout is applied here; a caller that needs one calls
//! [`DropdownLoader::abandon`] when its own deadline passes.

use std::collections::{HashMap, HashSet};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::capabilities::{DomQuery, FetchFailure, FetchResponse, HttpClient, RequestId};
use crate::html::escape_attr;
use crate::settings::Settings;
use crate::{Error, NodeId, Result};

const URL_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownBinding {
    pub parent_id: String,
    pub child_id: String,
    /// URL containing the parent id as a placeholder, e.g. `/cities/state_id/`.
    pub url_template: String,
}

impl DropdownBinding {
    pub fn new(parent_id: &str, child_id: &str, url_template: &str) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
            url_template: url_template.to_string(),
        }
    }

    /// Replaces the first occurrence of the parent id with the encoded value.
    pub fn request_url(&self, parent_value: &str) -> String {
        if !self.url_template.contains(&self.parent_id) {
            log::debug!(
                "url template {} has no {} placeholder",
                self.url_template,
                self.parent_id
            );
        }
        let encoded = utf8_percent_encode(parent_value, URL_VALUE).to_string();
        self.url_template.replacen(&self.parent_id, &encoded, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { child_id: String },
    /// A newer load for the same child was issued after this one.
    Stale { child_id: String },
    Failed {
        child_id: String,
        failure: FetchFailure,
    },
    /// The response does not belong to a load this loader is waiting for.
    Unknown(RequestId),
}

#[derive(Debug, Clone)]
struct PendingLoad {
    child_id: String,
    child_value: String,
    indicator: NodeId,
}

#[derive(Debug, Default)]
pub struct DropdownLoader {
    settings: Settings,
    pending: HashMap<RequestId, PendingLoad>,
    latest: HashMap<String, RequestId>,
    /// Children whose container this loader marked after a failed load.
    marked_failed: HashSet<String>,
}

impl DropdownLoader {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            pending: HashMap::new(),
            latest: HashMap::new(),
            marked_failed: HashSet::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Starts loading the child's options for the parent's current value.
    ///
    /// A non-empty `parent_value_to_set` is written to the parent first.
    /// Once the response is applied, `child_value_to_select` is selected in
    /// the child.
    pub fn load_dependent<H>(
        &mut self,
        host: &mut H,
        binding: &DropdownBinding,
        parent_value_to_set: &str,
        child_value_to_select: &str,
        loading_indicator_url: &str,
    ) -> Result<RequestId>
    where
        H: DomQuery + HttpClient + ?Sized,
    {
        let parent = host
            .element_by_id(&binding.parent_id)
            .ok_or_else(|| Error::ElementNotFound(binding.parent_id.clone()))?;
        let child = host
            .element_by_id(&binding.child_id)
            .ok_or_else(|| Error::ElementNotFound(binding.child_id.clone()))?;

        if !parent_value_to_set.is_empty() {
            host.set_value(parent, parent_value_to_set)?;
        }
        let url = binding.request_url(&host.value(parent)?);
        let indicator =
            self.ensure_indicator(host, child, &binding.child_id, loading_indicator_url)?;

        let request = host.begin_get(&url);
        if let Some(previous) = self.latest.insert(binding.child_id.clone(), request) {
            log::debug!(
                "load {request} for #{} supersedes {previous}",
                binding.child_id
            );
        }
        self.pending.insert(
            request,
            PendingLoad {
                child_id: binding.child_id.clone(),
                child_value: child_value_to_select.to_string(),
                indicator,
            },
        );
        Ok(request)
    }

    fn ensure_indicator<H>(
        &self,
        host: &mut H,
        child: NodeId,
        child_id: &str,
        loading_indicator_url: &str,
    ) -> Result<NodeId>
    where
        H: DomQuery + ?Sized,
    {
        let in_flight = self
            .latest
            .get(child_id)
            .and_then(|request| self.pending.get(request));
        if let Some(load) = in_flight {
            return Ok(load.indicator);
        }

        let markup = format!(
            r#"<div id="{}" class="{}"><img src="{}" alt="Loading" title="Loading"></div>"#,
            escape_attr(&self.settings.indicator_id(child_id)),
            escape_attr(&self.settings.indicator_class),
            escape_attr(loading_indicator_url),
        );
        host.insert_html_before(child, &markup)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::HtmlParse("loading indicator produced no element".into()))
    }

    /// Applies one response. This is the continuation of
    /// [`DropdownLoader::load_dependent`].
    ///
    /// On failure, including a body that is not valid option markup, the
    /// indicator is removed at once and the child keeps its previous options.
    /// Its container gets the error class, which a later applied load clears
    /// only if this loader set it.
    pub fn on_response<H>(&mut self, host: &mut H, response: FetchResponse) -> Result<LoadOutcome>
    where
        H: DomQuery + ?Sized,
    {
        let Some(load) = self.pending.remove(&response.request) else {
            return Ok(LoadOutcome::Unknown(response.request));
        };
        if self.latest.get(&load.child_id) != Some(&response.request) {
            log::debug!(
                "dropping stale response {} for #{}",
                response.request,
                load.child_id
            );
            return Ok(LoadOutcome::Stale {
                child_id: load.child_id,
            });
        }
        self.latest.remove(&load.child_id);

        let child = host.element_by_id(&load.child_id);
        let (markup, child) = match (response.body, child) {
            (Ok(body), Some(child)) => (body, child),
            (Ok(_), None) => {
                host.remove_with_transition(load.indicator, 0)?;
                return Err(Error::ElementNotFound(load.child_id));
            }
            (Err(failure), child) => {
                log::warn!(
                    "loading options for #{} from {} failed: {failure}",
                    load.child_id,
                    response.url
                );
                return self.fail_load(host, load, child, failure);
            }
        };

        if let Err(err) = host.set_inner_html(child, &markup) {
            log::warn!(
                "options for #{} from {} are not valid markup: {err}",
                load.child_id,
                response.url
            );
            let failure = FetchFailure::Malformed(err.to_string());
            return self.fail_load(host, load, Some(child), failure);
        }
        host.remove_with_transition(load.indicator, self.settings.indicator_transition_ms)?;
        host.set_value(child, &load.child_value)?;
        if self.marked_failed.remove(&load.child_id) {
            if let Some(container) = host.parent_element(child) {
                host.remove_class(container, &self.settings.error_class)?;
            }
        }
        Ok(LoadOutcome::Applied {
            child_id: load.child_id,
        })
    }

    fn fail_load<H>(
        &mut self,
        host: &mut H,
        load: PendingLoad,
        child: Option<NodeId>,
        failure: FetchFailure,
    ) -> Result<LoadOutcome>
    where
        H: DomQuery + ?Sized,
    {
        host.remove_with_transition(load.indicator, 0)?;
        if let Some(container) = child.and_then(|node| host.parent_element(node)) {
            host.add_class(container, &self.settings.error_class)?;
            self.marked_failed.insert(load.child_id.clone());
        }
        Ok(LoadOutcome::Failed {
            child_id: load.child_id,
            failure,
        })
    }

    /// Feeds every response the host has ready through
    /// [`DropdownLoader::on_response`], in arrival order.
    pub fn run_until_idle<H>(&mut self, host: &mut H) -> Result<Vec<LoadOutcome>>
    where
        H: DomQuery + HttpClient + ?Sized,
    {
        let mut outcomes = Vec::new();
        while let Some(response) = host.poll_response() {
            outcomes.push(self.on_response(host, response)?);
        }
        Ok(outcomes)
    }

    /// Gives up on every pending load of `child_id` and removes its
    /// indicator. Responses arriving afterwards are reported as unknown.
    pub fn abandon<H: DomQuery + ?Sized>(&mut self, host: &mut H, child_id: &str) -> Result<bool> {
        self.latest.remove(child_id);
        let requests = self
            .pending
            .iter()
            .filter(|(_, load)| load.child_id == child_id)
            .map(|(request, _)| *request)
            .collect::<Vec<_>>();
        let mut indicator = None;
        for request in &requests {
            if let Some(load) = self.pending.remove(request) {
                indicator = Some(load.indicator);
            }
        }
        if let Some(indicator) = indicator {
            host.remove_with_transition(indicator, 0)?;
        }
        Ok(!requests.is_empty())
    }

    pub fn is_loading(&self, child_id: &str) -> bool {
        self.latest.contains_key(child_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
