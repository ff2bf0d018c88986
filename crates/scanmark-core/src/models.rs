//! Data models for scanmark
//!
//! Defines the bookmark entry, the range entry and display-name rules.
//! Entries are shared as `Arc`s and compared by reference: two entries with
//! the same fields are still different bookmarks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use uuid::Uuid;

use crate::tree::DataNode;
use crate::tuning::Tuning;

/// Node name used for a serialized bookmark
pub const MODEM_NODE: &str = "modem";

/// Keys the store interprets inside a settings blob; everything else is opaque
pub mod keys {
    /// Entry id, written on save and stripped from the blob on load
    pub const ID: &str = "@id";

    pub const FREQUENCY: &str = "frequency";
    pub const TYPE: &str = "type";
    pub const BANDWIDTH: &str = "bandwidth";
    pub const USER_LABEL: &str = "user_label";

    pub const RANGE_LABEL: &str = "label";
    pub const RANGE_FREQ: &str = "freq";
    pub const RANGE_START: &str = "start";
    pub const RANGE_END: &str = "end";
}

/// Shared handle to a bookmark entry
pub type BookmarkRef = Arc<BookmarkEntry>;

/// Shared handle to a range entry
pub type RangeRef = Arc<RangeEntry>;

/// Mutable fields of a bookmark, guarded by the entry lock
#[derive(Debug, Clone, PartialEq)]
pub struct EntryState {
    /// Center frequency in Hz
    pub frequency: i64,
    /// Bandwidth in Hz
    pub bandwidth: i64,
    /// Demodulator mode tag
    pub mod_type: String,
    /// User label, may be empty
    pub label: String,
    /// Full demodulator configuration, preserved verbatim
    pub settings: DataNode,
}

impl EntryState {
    /// Change the label, keeping the settings blob in step
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.settings.set_child(keys::USER_LABEL, self.label.as_str());
    }

    pub fn display_name(&self) -> String {
        display_name(&self.label, self.frequency, &self.mod_type)
    }

    /// Make sure the interpreted keys in the blob match the fields
    fn stamp_settings(&mut self) {
        self.settings.set_name(MODEM_NODE);
        self.settings.set_child(keys::FREQUENCY, self.frequency);
        self.settings.set_child(keys::TYPE, self.mod_type.as_str());
        self.settings.set_child(keys::BANDWIDTH, self.bandwidth);
        self.settings.set_child(keys::USER_LABEL, self.label.as_str());
    }
}

/// A saved frequency bookmark
#[derive(Debug)]
pub struct BookmarkEntry {
    id: Uuid,
    state: Mutex<EntryState>,
}

impl BookmarkEntry {
    /// Create a bookmark from explicit fields
    pub fn new(
        frequency: i64,
        bandwidth: i64,
        mod_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let mut state = EntryState {
            frequency,
            bandwidth,
            mod_type: mod_type.into(),
            label: label.into(),
            settings: DataNode::new(MODEM_NODE),
        };
        state.stamp_settings();
        Self::from_state(Uuid::new_v4(), state)
    }

    /// Snapshot a live tuning, including its full settings blob
    pub fn from_tuning(tuning: &dyn Tuning) -> Self {
        let mut settings = DataNode::new(MODEM_NODE);
        tuning.write_settings(&mut settings);

        let mut state = EntryState {
            frequency: tuning.frequency(),
            bandwidth: tuning.bandwidth(),
            mod_type: tuning.mod_type(),
            label: tuning.user_label(),
            settings,
        };
        state.stamp_settings();
        Self::from_state(Uuid::new_v4(), state)
    }

    /// Decode a bookmark from a serialized `modem` node
    ///
    /// Returns `None` unless `frequency`, `type` and `bandwidth` are all
    /// present. The node is kept whole as the settings blob so fields this
    /// layer does not understand survive a later save. The saved `@id` is
    /// reused; a missing or invalid one gets a fresh id.
    pub fn from_node(node: &DataNode) -> Option<Self> {
        let frequency = node.get_i64(keys::FREQUENCY)?;
        let mod_type = node.get_text(keys::TYPE)?;
        let bandwidth = node.get_i64(keys::BANDWIDTH)?;
        let label = node.get_text(keys::USER_LABEL).unwrap_or_default();

        let mut settings = node.clone();
        settings.set_name(MODEM_NODE);
        let id = read_id(&mut settings);

        Some(Self::from_state(id, EntryState {
            frequency,
            bandwidth,
            mod_type,
            label,
            settings,
        }))
    }

    fn from_state(id: Uuid, state: EntryState) -> Self {
        Self {
            id,
            state: Mutex::new(state),
        }
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> BookmarkRef {
        Arc::new(self)
    }

    /// Stable identifier, used to address entries from outside the process
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Acquire the entry lock
    pub fn lock(&self) -> MutexGuard<'_, EntryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current fields
    pub fn snapshot(&self) -> EntryState {
        self.lock().clone()
    }

    pub fn frequency(&self) -> i64 {
        self.lock().frequency
    }

    pub fn bandwidth(&self) -> i64 {
        self.lock().bandwidth
    }

    pub fn mod_type(&self) -> String {
        self.lock().mod_type.clone()
    }

    pub fn label(&self) -> String {
        self.lock().label.clone()
    }

    /// Copy of the settings blob
    pub fn settings(&self) -> DataNode {
        self.lock().settings.clone()
    }

    /// The settings blob as saved, carrying the entry id
    pub fn to_node(&self) -> DataNode {
        let mut node = self.settings();
        node.set_child(keys::ID, self.id.to_string());
        node
    }

    pub fn display_name(&self) -> String {
        self.lock().display_name()
    }

    /// Ordering key for group lists: frequency, then label
    pub(crate) fn sort_key(&self) -> (i64, String) {
        let state = self.lock();
        (state.frequency, state.label.clone())
    }
}

/// A saved frequency span
#[derive(Debug, Clone, Serialize)]
pub struct RangeEntry {
    id: Uuid,
    /// Display label
    pub label: String,
    /// Center frequency in Hz
    pub freq: i64,
    /// Lower edge in Hz
    pub start_freq: i64,
    /// Upper edge in Hz
    pub end_freq: i64,
}

impl RangeEntry {
    pub fn new(label: impl Into<String>, freq: i64, start_freq: i64, end_freq: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            freq,
            start_freq,
            end_freq,
        }
    }

    /// Create a range centered between its edges
    pub fn centered(label: impl Into<String>, start_freq: i64, end_freq: i64) -> Self {
        let freq = start_freq + (end_freq - start_freq) / 2;
        Self::new(label, freq, start_freq, end_freq)
    }

    /// Decode a `range` node; all four fields are required
    pub fn from_node(node: &DataNode) -> Option<Self> {
        let mut range = Self::new(
            node.get_text(keys::RANGE_LABEL)?,
            node.get_i64(keys::RANGE_FREQ)?,
            node.get_i64(keys::RANGE_START)?,
            node.get_i64(keys::RANGE_END)?,
        );
        if let Some(id) = parse_id(node) {
            range.id = id;
        }
        Some(range)
    }

    /// Fill `node` with this range's fields
    pub fn write_node(&self, node: &mut DataNode) {
        node.set_child(keys::ID, self.id.to_string());
        node.set_child(keys::RANGE_LABEL, self.label.as_str());
        node.set_child(keys::RANGE_FREQ, self.freq);
        node.set_child(keys::RANGE_START, self.start_freq);
        node.set_child(keys::RANGE_END, self.end_freq);
    }

    pub fn into_ref(self) -> RangeRef {
        Arc::new(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display_name(&self) -> String {
        if self.label.is_empty() {
            format!(
                "{} - {}",
                format_frequency(self.start_freq),
                format_frequency(self.end_freq)
            )
        } else {
            self.label.clone()
        }
    }
}

fn parse_id(node: &DataNode) -> Option<Uuid> {
    node.get_text(keys::ID)
        .and_then(|text| Uuid::parse_str(text.trim()).ok())
}

/// Take the saved id out of a blob
fn read_id(settings: &mut DataNode) -> Uuid {
    let id = parse_id(settings).unwrap_or_else(Uuid::new_v4);
    settings.remove_children(keys::ID);
    id
}

/// Label if set, otherwise `"<frequency> <type>"`
pub fn display_name(label: &str, frequency: i64, mod_type: &str) -> String {
    if label.is_empty() {
        format!("{} {}", format_frequency(frequency), mod_type)
    } else {
        label.to_string()
    }
}

/// Display name for a live tuning that has no saved bookmark yet
pub fn active_display_name(tuning: &dyn Tuning) -> String {
    display_name(&tuning.user_label(), tuning.frequency(), &tuning.mod_type())
}

/// Human-readable frequency, e.g. `121.5MHz`
///
/// Uses a fixed number of significant digits per unit and trims trailing
/// zeros.
pub fn format_frequency(hz: i64) -> String {
    let value = hz as f64;
    let (scaled, precision, suffix) = if value.abs() >= 1.0e9 {
        (value / 1.0e9, 10usize, "GHz")
    } else if value.abs() >= 1.0e6 {
        (value / 1.0e6, 7, "MHz")
    } else if value.abs() >= 1.0e3 {
        (value / 1.0e3, 4, "kHz")
    } else {
        return format!("{}Hz", hz);
    };

    let int_digits = (scaled.abs().trunc() as i64).to_string().len();
    let decimals = precision.saturating_sub(int_digits);
    let text = format!("{:.*}", decimals, scaled);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };

    format!("{}{}", text, suffix)
}
