//! Coarse research-category inference from keywords.
//!
//! A label applies when any of its trigger terms occurs as a substring of the
//! space-joined, lower-cased keyword list. Recall-oriented: short triggers
//! such as `ai` or `data` fire inside longer words too.

use facultydir_shared::ResearchArea;

/// Trigger terms per category, in output order.
const TRIGGERS: [(ResearchArea, &[&str]); 8] = [
    (
        ResearchArea::MachineLearning,
        &["machine learning", "deep learning", "neural network", "ai", "artificial intelligence"],
    ),
    (
        ResearchArea::Biomedical,
        &["biomedical", "medical", "clinical", "health", "disease"],
    ),
    (
        ResearchArea::Robotics,
        &["robot", "robotic", "automation", "autonomous"],
    ),
    (
        ResearchArea::Materials,
        &["material", "polymer", "composite", "nanomaterial"],
    ),
    (
        ResearchArea::Energy,
        &["energy", "renewable", "solar", "battery", "fuel cell"],
    ),
    (
        ResearchArea::Computing,
        &["computing", "software", "algorithm", "data"],
    ),
    (
        ResearchArea::Imaging,
        &["imaging", "vision", "image processing", "visualization"],
    ),
    (
        ResearchArea::Control,
        &["control", "optimization", "system"],
    ),
];

/// Classify keywords into zero or more broad research areas.
pub fn categorize<S: AsRef<str>>(keywords: &[S]) -> Vec<ResearchArea> {
    let joined = keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.trim().is_empty() {
        return Vec::new();
    }

    TRIGGERS
        .iter()
        .filter(|(_, terms)| terms.iter().any(|t| joined.contains(t)))
        .map(|(area, _)| *area)
        .collect()
}
