//! Search statistics and diagnostics

use std::collections::VecDeque;

/// Counters describing the planner's work
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    /// Searches run
    pub searches: u64,
    /// Searches that ended without reaching the goal
    pub failed_searches: u64,
    /// Nodes expanded by the most recent search
    pub last_expanded: usize,
    /// Nodes expanded over all searches
    pub total_expanded: u64,
    /// Node count of the most recent result
    pub last_path_len: usize,
}

impl SearchStats {
    /// Record a finished search
    pub fn record_search(&mut self, expanded: usize, path_len: usize) {
        self.searches += 1;
        self.last_expanded = expanded;
        self.total_expanded += expanded as u64;
        self.last_path_len = path_len;
        if path_len == 0 {
            self.failed_searches += 1;
        }
    }

    /// Average nodes expanded per search
    pub fn avg_expanded(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        self.total_expanded as f64 / self.searches as f64
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "Searches: {} (failed: {}) | Last: {} expanded, {} nodes | Avg expanded: {:.1}",
            self.searches,
            self.failed_searches,
            self.last_expanded,
            self.last_path_len,
            self.avg_expanded()
        )
    }
}

/// Bounded log of recoverable conditions worth surfacing
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Most recent lines, oldest first
    lines: VecDeque<String>,
    /// Maximum lines to keep
    max_lines: usize,
    /// Lines ever recorded, including evicted ones
    total: u64,
}

impl Diagnostics {
    /// Create an empty diagnostics log
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Create a log that keeps at most `max_lines`
    pub fn with_capacity(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines),
            max_lines: max_lines.max(1),
            total: 0,
        }
    }

    /// Add a line, evicting the oldest when full
    pub fn add_line(&mut self, line: impl Into<String>) {
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
        self.total += 1;
    }

    /// Clear all lines
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Lines currently kept, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Number of lines ever recorded
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
