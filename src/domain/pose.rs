//! Pose estimation results and the 17-keypoint body skeleton.

use crate::domain::detection::DetectedObject;
use serde::{Deserialize, Serialize};

/// The 17 body keypoints in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keypoint {
    /// Tip of the nose.
    Nose,
    /// Left eye.
    LeftEye,
    /// Right eye.
    RightEye,
    /// Left ear.
    LeftEar,
    /// Right ear.
    RightEar,
    /// Left shoulder.
    LeftShoulder,
    /// Right shoulder.
    RightShoulder,
    /// Left elbow.
    LeftElbow,
    /// Right elbow.
    RightElbow,
    /// Left wrist.
    LeftWrist,
    /// Right wrist.
    RightWrist,
    /// Left hip.
    LeftHip,
    /// Right hip.
    RightHip,
    /// Left knee.
    LeftKnee,
    /// Right knee.
    RightKnee,
    /// Left ankle.
    LeftAnkle,
    /// Right ankle.
    RightAnkle,
}

impl Keypoint {
    /// All keypoints, indexed by their position in the model output.
    pub const ALL: [Keypoint; 17] = [
        Keypoint::Nose,
        Keypoint::LeftEye,
        Keypoint::RightEye,
        Keypoint::LeftEar,
        Keypoint::RightEar,
        Keypoint::LeftShoulder,
        Keypoint::RightShoulder,
        Keypoint::LeftElbow,
        Keypoint::RightElbow,
        Keypoint::LeftWrist,
        Keypoint::RightWrist,
        Keypoint::LeftHip,
        Keypoint::RightHip,
        Keypoint::LeftKnee,
        Keypoint::RightKnee,
        Keypoint::LeftAnkle,
        Keypoint::RightAnkle,
    ];

    /// Keypoint at output position `index`.
    pub fn from_index(index: usize) -> Option<Keypoint> {
        Self::ALL.get(index).copied()
    }

    /// Position of this keypoint in the model output.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Label stored on decoded landmarks.
    pub fn label(&self) -> &'static str {
        match self {
            Keypoint::Nose => "nose",
            Keypoint::LeftEye => "left_eye",
            Keypoint::RightEye => "right_eye",
            Keypoint::LeftEar => "left_ear",
            Keypoint::RightEar => "right_ear",
            Keypoint::LeftShoulder => "left_shoulder",
            Keypoint::RightShoulder => "right_shoulder",
            Keypoint::LeftElbow => "left_elbow",
            Keypoint::RightElbow => "right_elbow",
            Keypoint::LeftWrist => "left_wrist",
            Keypoint::RightWrist => "right_wrist",
            Keypoint::LeftHip => "left_hip",
            Keypoint::RightHip => "right_hip",
            Keypoint::LeftKnee => "left_knee",
            Keypoint::RightKnee => "right_knee",
            Keypoint::LeftAnkle => "left_ankle",
            Keypoint::RightAnkle => "right_ankle",
        }
    }
}

/// A skeleton edge between two keypoint indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoseEdge {
    /// Index of the first landmark.
    pub start: usize,
    /// Index of the second landmark.
    pub end: usize,
}

const fn edge(start: Keypoint, end: Keypoint) -> PoseEdge {
    PoseEdge {
        start: start as usize,
        end: end as usize,
    }
}

/// The fixed skeleton over the 17 keypoints.
pub const POSE_EDGES: [PoseEdge; 18] = [
    edge(Keypoint::Nose, Keypoint::LeftEye),
    edge(Keypoint::Nose, Keypoint::RightEye),
    edge(Keypoint::LeftEye, Keypoint::LeftEar),
    edge(Keypoint::RightEye, Keypoint::RightEar),
    edge(Keypoint::Nose, Keypoint::LeftShoulder),
    edge(Keypoint::Nose, Keypoint::RightShoulder),
    edge(Keypoint::LeftShoulder, Keypoint::LeftElbow),
    edge(Keypoint::LeftElbow, Keypoint::LeftWrist),
    edge(Keypoint::RightShoulder, Keypoint::RightElbow),
    edge(Keypoint::RightElbow, Keypoint::RightWrist),
    edge(Keypoint::LeftShoulder, Keypoint::RightShoulder),
    edge(Keypoint::LeftShoulder, Keypoint::LeftHip),
    edge(Keypoint::RightShoulder, Keypoint::RightHip),
    edge(Keypoint::LeftHip, Keypoint::RightHip),
    edge(Keypoint::LeftHip, Keypoint::LeftKnee),
    edge(Keypoint::LeftKnee, Keypoint::LeftAnkle),
    edge(Keypoint::RightHip, Keypoint::RightKnee),
    edge(Keypoint::RightKnee, Keypoint::RightAnkle),
];

/// One body keypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmark {
    /// Keypoint name, empty when no label table was supplied.
    pub label: String,
    /// Horizontal position normalized to `[0, 1]`.
    pub x: f32,
    /// Vertical position normalized to `[0, 1]`.
    pub y: f32,
    /// Keypoint confidence.
    pub probability: f32,
}

/// One person's skeleton: 17 landmarks in keypoint order plus the fixed edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPose {
    landmarks: Vec<PoseLandmark>,
    edges: Vec<PoseEdge>,
}

impl DetectedPose {
    /// Creates a pose over the standard skeleton.
    pub fn new(landmarks: Vec<PoseLandmark>) -> Self {
        Self {
            landmarks,
            edges: POSE_EDGES.to_vec(),
        }
    }

    /// Landmarks in keypoint order.
    pub fn landmarks(&self) -> &[PoseLandmark] {
        &self.landmarks
    }

    /// Skeleton edges.
    pub fn edges(&self) -> &[PoseEdge] {
        &self.edges
    }

    /// Landmark for a given keypoint.
    pub fn landmark(&self, keypoint: Keypoint) -> Option<&PoseLandmark> {
        self.landmarks.get(keypoint.index())
    }

    /// Resolves every edge into its pair of landmarks.
    pub fn edge_landmarks(&self) -> Vec<(&PoseLandmark, &PoseLandmark)> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.landmarks.get(e.start)?, self.landmarks.get(e.end)?)))
            .collect()
    }
}

/// Every person found in one image, in decode order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPoseDetectionResult {
    poses: Vec<(DetectedObject, DetectedPose)>,
}

impl MultiPoseDetectionResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a person.
    pub fn push(&mut self, object: DetectedObject, pose: DetectedPose) {
        self.poses.push((object, pose));
    }

    /// Number of people.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns true when nobody was detected.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Iterates over `(box, skeleton)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(DetectedObject, DetectedPose)> {
        self.poses.iter()
    }

    /// Consumes the result.
    pub fn into_inner(self) -> Vec<(DetectedObject, DetectedPose)> {
        self.poses
    }
}

impl IntoIterator for MultiPoseDetectionResult {
    type Item = (DetectedObject, DetectedPose);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_reference_valid_keypoints() {
        assert_eq!(POSE_EDGES.len(), 18);
        for e in POSE_EDGES {
            assert!(e.start < 17 && e.end < 17);
        }
        assert_eq!(POSE_EDGES[0], PoseEdge { start: 0, end: 1 });
        assert_eq!(POSE_EDGES[17], PoseEdge { start: 14, end: 16 });
    }

    #[test]
    fn test_keypoint_indices() {
        for (i, kp) in Keypoint::ALL.iter().enumerate() {
            assert_eq!(kp.index(), i);
            assert_eq!(Keypoint::from_index(i), Some(*kp));
        }
        assert_eq!(Keypoint::from_index(17), None);
    }

    #[test]
    fn test_edge_landmarks() {
        let landmarks = Keypoint::ALL
            .iter()
            .map(|kp| PoseLandmark {
                label: kp.label().to_string(),
                x: 0.0,
                y: 0.0,
                probability: 1.0,
            })
            .collect();
        let pose = DetectedPose::new(landmarks);
        let pairs = pose.edge_landmarks();
        assert_eq!(pairs.len(), 18);
        assert_eq!(pairs[10].0.label, "left_shoulder");
        assert_eq!(pairs[10].1.label, "right_shoulder");
    }
}
