//! Diagnosis buckets and the aggregate assessment result.
//!
//! Classification maps the accuracy of a completed session onto one of three
//! ordered buckets. Cut points live in [`ClassificationThresholds`].

use serde::{Deserialize, Serialize};

use super::response::Response;

/// Color vision classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    /// Accuracy below the mild threshold
    SignificantDeficiency,
    /// Accuracy in `[mild, normal)`
    MildDeficiency,
    /// Accuracy at or above the normal threshold
    Normal,
}

impl Diagnosis {
    /// Get a human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SignificantDeficiency => "Significant Color Vision Deficiency",
            Self::MildDeficiency => "Mild Color Vision Deficiency",
            Self::Normal => "Normal Color Vision",
        }
    }

    /// Recommendations shown alongside the diagnosis, in display order.
    #[must_use]
    pub fn recommendations(&self) -> Vec<String> {
        let lines: &[&str] = match self {
            Self::SignificantDeficiency => &[
                "Your results indicate a significant color vision deficiency.",
                "Schedule a comprehensive eye examination with an optometrist or ophthalmologist.",
                "Ask about anomaloscope or Farnsworth D-15 testing to confirm the type and severity.",
                "Consider this result before pursuing roles where color signals are safety-critical.",
            ],
            Self::MildDeficiency => &[
                "Your results suggest a mild color vision deficiency.",
                "Consider supplemental testing such as Ishihara plates to confirm the finding.",
                "Retake this test under good lighting to rule out environmental factors.",
            ],
            Self::Normal => &[
                "Your color vision appears to be within the normal range.",
                "No further action is needed. Retest if you notice changes in color perception.",
            ],
        };

        lines.iter().map(|s| (*s).to_string()).collect()
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Normal => (16, 185, 129),                // Emerald (#10B981)
            Self::MildDeficiency => (251, 191, 36),        // Amber (#FBBF24)
            Self::SignificantDeficiency => (244, 63, 94), // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accuracy cut points (percent). Both bounds are inclusive on the upper bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// Lowest accuracy classified as a mild deficiency
    pub mild_min_percent: f64,

    /// Lowest accuracy classified as normal
    pub normal_min_percent: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            mild_min_percent: 50.0,
            normal_min_percent: 75.0,
        }
    }
}

impl ClassificationThresholds {
    /// Check `0 <= mild <= normal <= 100`.
    ///
    /// # Errors
    /// Returns a description of the violated bound.
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);

        if !in_range(self.mild_min_percent) {
            return Err(format!(
                "Mild threshold {} out of range [0, 100]",
                self.mild_min_percent
            ));
        }
        if !in_range(self.normal_min_percent) {
            return Err(format!(
                "Normal threshold {} out of range [0, 100]",
                self.normal_min_percent
            ));
        }
        if self.mild_min_percent > self.normal_min_percent {
            return Err(format!(
                "Mild threshold {} exceeds normal threshold {}",
                self.mild_min_percent, self.normal_min_percent
            ));
        }
        Ok(())
    }

    /// Bucket an accuracy percentage.
    #[must_use]
    pub fn diagnose(&self, accuracy_percent: f64) -> Diagnosis {
        if accuracy_percent >= self.normal_min_percent {
            Diagnosis::Normal
        } else if accuracy_percent >= self.mild_min_percent {
            Diagnosis::MildDeficiency
        } else {
            Diagnosis::SignificantDeficiency
        }
    }
}

/// Output of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub accuracy_percent: f64,
    pub diagnosis: Diagnosis,
    pub recommendations: Vec<String>,
}

/// Classify a response log with the default thresholds.
#[must_use]
pub fn classify(responses: &[Response]) -> Classification {
    classify_with(responses, &ClassificationThresholds::default())
}

/// Classify a response log. Pure and deterministic.
///
/// An empty log scores 0%.
#[must_use]
pub fn classify_with(responses: &[Response], thresholds: &ClassificationThresholds) -> Classification {
    let accuracy_percent = accuracy_percent(responses);
    let diagnosis = thresholds.diagnose(accuracy_percent);

    Classification {
        accuracy_percent,
        diagnosis,
        recommendations: diagnosis.recommendations(),
    }
}

fn accuracy_percent(responses: &[Response]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let correct = responses.iter().filter(|r| r.is_correct).count();
    100.0 * correct as f64 / responses.len() as f64
}

/// Final result of a completed session, handed to the host once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Unique identifier
    pub id: String,

    pub total_questions: usize,

    pub correct_answers: usize,

    /// 0-100
    pub accuracy_percent: f64,

    /// Full response log, in bank order
    pub responses: Vec<Response>,

    pub diagnosis: Diagnosis,

    pub recommendations: Vec<String>,

    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl AssessmentResult {
    /// Build the result from a finished response log.
    #[must_use]
    pub fn from_responses(responses: Vec<Response>, thresholds: &ClassificationThresholds) -> Self {
        let classification = classify_with(&responses, thresholds);

        Self {
            id: uuid_v4(),
            total_questions: responses.len(),
            correct_answers: responses.iter().filter(|r| r.is_correct).count(),
            accuracy_percent: classification.accuracy_percent,
            responses,
            diagnosis: classification.diagnosis,
            recommendations: classification.recommendations,
            completed_at: chrono::Utc::now(),
        }
    }

    /// Number of questions resolved by the countdown rather than a submit.
    #[must_use]
    pub fn timed_out_count(&self) -> usize {
        self.responses.iter().filter(|r| r.timed_out).count()
    }

    /// Mean response latency; 0 for an empty log.
    #[must_use]
    pub fn average_response_time_ms(&self) -> u64 {
        if self.responses.is_empty() {
            return 0;
        }
        let total: u64 = self.responses.iter().map(|r| r.response_time_ms).sum();
        total / self.responses.len() as u64
    }
}

/// Random RFC 4122 version 4 id, used to tag assessment results.
fn uuid_v4() -> String {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    let mut bytes: [u8; 16] = ChaCha20Rng::from_entropy().gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    [&hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32]].join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(correct: usize, total: usize) -> Vec<Response> {
        (0..total)
            .map(|i| Response {
                question_id: i as u32 + 1,
                user_answer: "red-green".to_string(),
                correct_answer: "red-green".to_string(),
                is_correct: i < correct,
                response_time_ms: 1000,
                timed_out: false,
            })
            .collect()
    }

    #[test]
    fn test_half_correct_is_mild() {
        let c = classify(&log(4, 8));
        assert!((c.accuracy_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(c.diagnosis, Diagnosis::MildDeficiency);
        assert_eq!(c.diagnosis.to_string(), "Mild Color Vision Deficiency");
    }

    #[test]
    fn test_three_quarters_is_normal() {
        let c = classify(&log(6, 8));
        assert!((c.accuracy_percent - 75.0).abs() < f64::EPSILON);
        assert_eq!(c.diagnosis, Diagnosis::Normal);
    }

    #[test]
    fn test_below_half_is_significant() {
        let c = classify(&log(3, 8));
        assert!((c.accuracy_percent - 37.5).abs() < f64::EPSILON);
        assert_eq!(c.diagnosis, Diagnosis::SignificantDeficiency);
        assert!(c.recommendations.len() > 1);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let responses = log(5, 8);
        assert_eq!(classify(&responses), classify(&responses));
    }

    #[test]
    fn test_empty_log_scores_zero() {
        let c = classify(&[]);
        assert_eq!(c.accuracy_percent, 0.0);
        assert_eq!(c.diagnosis, Diagnosis::SignificantDeficiency);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(classify(&log(0, 4)).diagnosis, Diagnosis::SignificantDeficiency);
        assert_eq!(classify(&log(4, 4)).diagnosis, Diagnosis::Normal);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = ClassificationThresholds {
            mild_min_percent: 60.0,
            normal_min_percent: 90.0,
        };
        assert_eq!(classify_with(&log(4, 8), &strict).diagnosis, Diagnosis::SignificantDeficiency);
        assert_eq!(classify_with(&log(6, 8), &strict).diagnosis, Diagnosis::MildDeficiency);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ClassificationThresholds::default().validate().is_ok());
        let inverted = ClassificationThresholds {
            mild_min_percent: 80.0,
            normal_min_percent: 70.0,
        };
        assert!(inverted.validate().is_err());
        let out_of_range = ClassificationThresholds {
            mild_min_percent: -1.0,
            normal_min_percent: 70.0,
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_result_from_responses() {
        let mut responses = log(1, 2);
        responses[1].timed_out = true;
        responses[1].response_time_ms = 15_000;

        let result = AssessmentResult::from_responses(responses, &ClassificationThresholds::default());
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.diagnosis, Diagnosis::MildDeficiency);
        assert_eq!(result.timed_out_count(), 1);
        assert_eq!(result.average_response_time_ms(), 8_000);
        assert_eq!(result.id.len(), 36);
    }

    #[test]
    fn test_result_id_is_uuid_v4() {
        let id = uuid_v4();
        let groups: Vec<&str> = id.split('-').collect();

        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
        assert!(groups[2].starts_with('4'), "version nibble: {id}");
        assert!(
            matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')),
            "variant bits: {id}"
        );
        assert_ne!(uuid_v4(), id);
    }
}
