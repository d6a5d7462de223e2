//! Bounded breadth-first frontier for one domain crawl
//!
//! Three caps bound the work spent on a domain:
//! - at most `max_visits` URLs are ever handed out
//! - at most `max_links_per_page` links are considered per visited page
//! - a link is only queued while the queue holds fewer than `max_queue` URLs

use crate::config::CrawlerConfig;
use std::collections::{HashSet, VecDeque};

/// Frontier caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierLimits {
    pub max_visits: usize,
    pub max_queue: usize,
    pub max_links_per_page: usize,
}

impl Default for FrontierLimits {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for FrontierLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_visits: config.max_pages_per_domain,
            max_queue: config.max_queue_size,
            max_links_per_page: config.max_links_per_page,
        }
    }
}

/// FIFO queue of pending URLs plus the set of URLs already handed out
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    visited: HashSet<String>,
    limits: FrontierLimits,
}

impl Frontier {
    /// Creates a frontier seeded with `seeds`, duplicates dropped
    pub fn new<I>(seeds: I, limits: FrontierLimits) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut queue = VecDeque::new();
        for seed in seeds {
            if !queue.contains(&seed) {
                queue.push_back(seed);
            }
        }

        Self {
            queue,
            visited: HashSet::new(),
            limits,
        }
    }

    /// Hands out the next unvisited URL and marks it visited
    ///
    /// Already-visited entries are discarded without counting toward the
    /// visit cap. Returns `None` once the queue is drained or the cap is hit.
    pub fn next_url(&mut self) -> Option<String> {
        while self.visited.len() < self.limits.max_visits {
            let url = self.queue.pop_front()?;
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited {}", url);
        }
        None
    }

    /// Offers one page's qualifying links; returns how many were queued
    ///
    /// Only the first `max_links_per_page` links are considered. Each is queued
    /// if it has not been visited and the queue is below `max_queue`.
    pub fn enqueue_links<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for link in links.into_iter().take(self.limits.max_links_per_page) {
            if self.queue.len() >= self.limits.max_queue {
                break;
            }
            if !self.visited.contains(&link) {
                self.queue.push_back(link);
                added += 1;
            }
        }
        added
    }

    /// Number of URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of pending URLs
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() || self.visited.len() >= self.limits.max_visits
    }
}
