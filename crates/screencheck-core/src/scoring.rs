#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerSet {
    pub uses_device_before_sleep: bool,
    pub difficulty_without_social_media: bool,
    pub uses_device_during_meals: bool,
    pub device_distracts_at_work_or_study: bool,
}

impl AnswerSet {
    pub fn from_slots(slots: [bool; 4]) -> Self {
        let [uses_device_before_sleep, difficulty_without_social_media, uses_device_during_meals, device_distracts_at_work_or_study] =
            slots;
        Self {
            uses_device_before_sleep,
            difficulty_without_social_media,
            uses_device_during_meals,
            device_distracts_at_work_or_study,
        }
    }

    pub fn as_slots(&self) -> [bool; 4] {
        [
            self.uses_device_before_sleep,
            self.difficulty_without_social_media,
            self.uses_device_during_meals,
            self.device_distracts_at_work_or_study,
        ]
    }

    pub fn to_inputs(&self) -> [f64; 4] {
        self.as_slots().map(|answer| if answer { 1.0 } else { 0.0 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Low => "Your technology dependence level is low.",
            Self::Medium => "Your technology dependence level is moderate. Keep the balance.",
            Self::High => {
                "Your technology dependence level is high. Consider cutting back on screen time."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub level: Tier,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    pub weights: [f64; 4],
    pub bias: f64,
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            weights: [0.25, 0.35, 0.20, 0.30],
            bias: -0.5,
            high_threshold: 0.65,
            medium_threshold: 0.35,
        }
    }
}

impl ScoringModel {
    pub fn score(&self, answers: &AnswerSet) -> ScoreResult {
        let mut sum = self.bias;
        for (weight, input) in self.weights.iter().zip(answers.to_inputs()) {
            sum += weight * input;
        }
        let score = sigmoid(sum);
        let level = self.classify(score);
        ScoreResult {
            score,
            level,
            message: level.advice(),
        }
    }

    // Strict comparisons: a score landing exactly on a threshold takes the lower tier.
    pub fn classify(&self, score: f64) -> Tier {
        if score > self.high_threshold {
            Tier::High
        } else if score > self.medium_threshold {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
