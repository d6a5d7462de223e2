//! Crawler module for form discovery
//!
//! This module contains the crawling logic, including:
//! - The bounded breadth-first frontier for one domain
//! - Per-domain traversal over a renderer
//! - Run coordination across domains with persisted progress

mod coordinator;
mod domain;
mod frontier;

pub use coordinator::{Coordinator, RunPlan, RunReport};
pub use domain::{crawl_domain, traverse, CrawlOutcome, CrawlSettings};
pub use frontier::{Frontier, FrontierLimits};
