//! Test doubles for the collaborator traits

use std::sync::{Arc, Mutex};

use crate::tree::DataNode;
use crate::tuning::{BookmarkObserver, Tuning, TuningSource};

/// In-memory stand-in for a live demodulator
#[derive(Debug)]
pub struct FakeTuning {
    frequency: Mutex<i64>,
    bandwidth: i64,
    mod_type: String,
    label: Mutex<String>,
    /// Last blob handed to `apply_settings`
    pub applied: Mutex<Option<DataNode>>,
}

impl FakeTuning {
    pub fn new(frequency: i64, bandwidth: i64, mod_type: &str) -> Self {
        Self {
            frequency: Mutex::new(frequency),
            bandwidth,
            mod_type: mod_type.to_string(),
            label: Mutex::new(String::new()),
            applied: Mutex::new(None),
        }
    }

    pub fn set_label(&self, label: &str) {
        *self.label.lock().unwrap() = label.to_string();
    }
}

impl Tuning for FakeTuning {
    fn frequency(&self) -> i64 {
        *self.frequency.lock().unwrap()
    }

    fn bandwidth(&self) -> i64 {
        self.bandwidth
    }

    fn mod_type(&self) -> String {
        self.mod_type.clone()
    }

    fn user_label(&self) -> String {
        self.label.lock().unwrap().clone()
    }

    fn write_settings(&self, node: &mut DataNode) {
        node.set_child("frequency", self.frequency());
        node.set_child("type", self.mod_type.as_str());
        node.set_child("bandwidth", self.bandwidth);
        node.set_child("squelch_level", -60_i64);
        node.set_child("gain", 12.5);
    }

    fn apply_settings(&self, node: &DataNode) {
        if let Some(freq) = node.get_i64("frequency") {
            *self.frequency.lock().unwrap() = freq;
        }
        if let Some(label) = node.get_text("user_label") {
            self.set_label(&label);
        }
        *self.applied.lock().unwrap() = Some(node.clone());
    }
}

/// Fixed list of live tunings
#[derive(Default)]
pub struct FakeSource {
    pub tunings: Vec<Arc<dyn Tuning>>,
}

impl TuningSource for FakeSource {
    fn active_tunings(&self) -> Vec<Arc<dyn Tuning>> {
        self.tunings.clone()
    }
}

/// Records every notification it receives
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl BookmarkObserver for RecordingObserver {
    fn active_list_changed(&self) {
        self.events.lock().unwrap().push("active".to_string());
    }

    fn bookmarks_changed(&self) {
        self.events.lock().unwrap().push("bookmarks".to_string());
    }

    fn group_changed(&self, group: &str) {
        self.events.lock().unwrap().push(format!("group:{}", group));
    }
}
