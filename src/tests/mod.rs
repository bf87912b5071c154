use super::*;

mod error_highlight;
mod navigation_confirm;
mod page_host_and_trace;
