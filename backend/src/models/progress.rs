// src/models/progress.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion state of one module for one learner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: bool,
    pub score: u8,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ModuleProgress {
    /// State of a module nobody has recorded anything for yet.
    pub fn not_started(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            ..Self::default()
        }
    }
}

/// Course-level view derived from the module records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    pub user_id: String,

    /// round(100 * completed / total), 0 when the course has no modules.
    pub progress: u8,

    /// True only when the course has modules and all of them are completed.
    pub completed: bool,

    /// Latest change among the module records.
    pub last_updated: Option<DateTime<Utc>>,

    pub modules: BTreeMap<String, ModuleProgress>,
}

/// Per-user summary folded over every course record at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub enrolled_courses: usize,
    pub completed_courses: usize,
    pub overall_progress: u8,
}
