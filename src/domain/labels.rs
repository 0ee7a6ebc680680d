//! Index to label tables.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a class index emitted by a model to a human-readable label.
///
/// Serialized as a list of `[index, label]` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(usize, String)>", into = "Vec<(usize, String)>")]
pub struct LabelMap {
    labels: HashMap<usize, String>,
}

impl LabelMap {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a contiguous, 0-based table from a list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (i, name.into()))
                .collect(),
        }
    }

    /// Builds a table from explicit `(index, label)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        Self {
            labels: pairs.into_iter().map(|(i, name)| (i, name.into())).collect(),
        }
    }

    /// Looks up the label for `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    /// Looks up a signed index, as read from a float class tensor.
    pub fn get_signed(&self, index: i64) -> Option<&str> {
        usize::try_from(index).ok().and_then(|i| self.get(i))
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, index: usize, label: impl Into<String>) {
        self.labels.insert(index, label.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries sorted by index.
    pub fn entries(&self) -> Vec<(usize, &str)> {
        let mut entries: Vec<(usize, &str)> = self
            .labels
            .iter()
            .map(|(&i, label)| (i, label.as_str()))
            .collect();
        entries.sort_by_key(|(i, _)| *i);
        entries
    }

    /// The COCO detection labels keyed by their original sparse 1-based ids (1..=90).
    pub fn coco91() -> Self {
        COCO91.clone()
    }

    /// The 80 COCO detection labels keyed contiguously from 0.
    pub fn coco80() -> Self {
        COCO80.clone()
    }
}

impl From<Vec<(usize, String)>> for LabelMap {
    fn from(pairs: Vec<(usize, String)>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl From<LabelMap> for Vec<(usize, String)> {
    fn from(map: LabelMap) -> Self {
        let mut pairs: Vec<(usize, String)> = map.labels.into_iter().collect();
        pairs.sort_by_key(|(i, _)| *i);
        pairs
    }
}

const COCO_IDS_AND_NAMES: [(usize, &str); 80] = [
    (1, "person"),
    (2, "bicycle"),
    (3, "car"),
    (4, "motorcycle"),
    (5, "airplane"),
    (6, "bus"),
    (7, "train"),
    (8, "truck"),
    (9, "boat"),
    (10, "traffic light"),
    (11, "fire hydrant"),
    (13, "stop sign"),
    (14, "parking meter"),
    (15, "bench"),
    (16, "bird"),
    (17, "cat"),
    (18, "dog"),
    (19, "horse"),
    (20, "sheep"),
    (21, "cow"),
    (22, "elephant"),
    (23, "bear"),
    (24, "zebra"),
    (25, "giraffe"),
    (27, "backpack"),
    (28, "umbrella"),
    (31, "handbag"),
    (32, "tie"),
    (33, "suitcase"),
    (34, "frisbee"),
    (35, "skis"),
    (36, "snowboard"),
    (37, "sports ball"),
    (38, "kite"),
    (39, "baseball bat"),
    (40, "baseball glove"),
    (41, "skateboard"),
    (42, "surfboard"),
    (43, "tennis racket"),
    (44, "bottle"),
    (46, "wine glass"),
    (47, "cup"),
    (48, "fork"),
    (49, "knife"),
    (50, "spoon"),
    (51, "bowl"),
    (52, "banana"),
    (53, "apple"),
    (54, "sandwich"),
    (55, "orange"),
    (56, "broccoli"),
    (57, "carrot"),
    (58, "hot dog"),
    (59, "pizza"),
    (60, "donut"),
    (61, "cake"),
    (62, "chair"),
    (63, "couch"),
    (64, "potted plant"),
    (65, "bed"),
    (67, "dining table"),
    (70, "toilet"),
    (72, "tv"),
    (73, "laptop"),
    (74, "mouse"),
    (75, "remote"),
    (76, "keyboard"),
    (77, "cell phone"),
    (78, "microwave"),
    (79, "oven"),
    (80, "toaster"),
    (81, "sink"),
    (82, "refrigerator"),
    (84, "book"),
    (85, "clock"),
    (86, "vase"),
    (87, "scissors"),
    (88, "teddy bear"),
    (89, "hair drier"),
    (90, "toothbrush"),
];

static COCO91: Lazy<LabelMap> = Lazy::new(|| LabelMap::from_pairs(COCO_IDS_AND_NAMES));

static COCO80: Lazy<LabelMap> =
    Lazy::new(|| LabelMap::from_names(COCO_IDS_AND_NAMES.iter().map(|(_, name)| *name)));
