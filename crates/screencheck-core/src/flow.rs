use crate::scoring::{AnswerSet, ScoreResult, ScoringModel, Tier};

pub const QUESTION_COUNT: usize = 4;

pub const QUESTION_TEXTS: [&str; QUESTION_COUNT] = [
    "Do you use your phone right before going to sleep?",
    "Do you struggle to get through a day without social media?",
    "Do you use your phone while eating?",
    "Does your phone distract you at work or while studying?",
];

pub const EARLY_EXIT_MESSAGE: &str = "No signs of technology dependence. Excellent!";

#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    AskingQuestion(usize),
    Completed(ScoreResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub answers: AnswerSet,
    pub level: Tier,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub result: ScoreResult,
    pub submission: Option<Submission>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    AskNext(usize),
    Finished(Completion),
}

#[derive(Debug, Clone)]
pub struct QuizStep {
    pub session: QuizSession,
    pub transition: Transition,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    model: ScoringModel,
    slots: [Option<bool>; QUESTION_COUNT],
    state: QuizState,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_model(ScoringModel::default())
    }

    pub fn with_model(model: ScoringModel) -> Self {
        Self {
            model,
            slots: [None; QUESTION_COUNT],
            state: QuizState::AskingQuestion(0),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn current_question(&self) -> Option<&'static str> {
        match self.state {
            QuizState::AskingQuestion(index) => QUESTION_TEXTS.get(index).copied(),
            QuizState::Completed(_) => None,
        }
    }

    pub fn answers(&self) -> [Option<bool>; QUESTION_COUNT] {
        self.slots
    }

    pub fn answer(mut self, answer: bool) -> QuizStep {
        let index = match self.state {
            QuizState::AskingQuestion(index) => index,
            QuizState::Completed(ref result) => {
                // A completed session ignores further answers and never resubmits.
                let completion = Completion {
                    result: result.clone(),
                    submission: None,
                };
                return QuizStep {
                    session: self,
                    transition: Transition::Finished(completion),
                };
            }
        };

        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(answer);
        }

        // The early exit is decided before the generic advance-or-complete rule.
        if index == 0 && !answer {
            let result = early_exit_result();
            self.state = QuizState::Completed(result.clone());
            return QuizStep {
                session: self,
                transition: Transition::Finished(Completion {
                    result,
                    submission: None,
                }),
            };
        }

        let next = index + 1;
        if next < QUESTION_COUNT {
            self.state = QuizState::AskingQuestion(next);
            return QuizStep {
                session: self,
                transition: Transition::AskNext(next),
            };
        }

        let answers = AnswerSet::from_slots(self.slots.map(|slot| slot.unwrap_or(false)));
        let result = self.model.score(&answers);
        let submission = Submission {
            answers,
            level: result.level,
            score: result.score,
        };
        self.state = QuizState::Completed(result.clone());
        QuizStep {
            session: self,
            transition: Transition::Finished(Completion {
                result,
                submission: Some(submission),
            }),
        }
    }

    pub fn reset(self) -> Self {
        Self::with_model(self.model)
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

// Hardcoded shortcut result. Scoring an all-no answer set through the model
// would land at sigmoid(-0.5), inside the medium band, so the shortcut must
// not go through ScoringModel.
fn early_exit_result() -> ScoreResult {
    ScoreResult {
        score: 0.0,
        level: Tier::Low,
        message: EARLY_EXIT_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(answers: &[bool]) -> (QuizSession, Vec<Transition>) {
        let mut session = QuizSession::new();
        let mut transitions = Vec::new();
        for &answer in answers {
            let step = session.answer(answer);
            session = step.session;
            transitions.push(step.transition);
        }
        (session, transitions)
    }

    #[test]
    fn early_exit_on_first_no_skips_scoring_and_submission() {
        let (session, transitions) = drive(&[false]);
        assert_eq!(transitions.len(), 1);
        let Transition::Finished(completion) = &transitions[0] else {
            panic!("expected a finished transition");
        };
        assert_eq!(completion.result.level, Tier::Low);
        assert!(completion.result.score == 0.0);
        assert_eq!(completion.result.message, EARLY_EXIT_MESSAGE);
        assert!(completion.submission.is_none());
        assert!(matches!(session.state(), QuizState::Completed(_)));
    }

    #[test]
    fn full_run_asks_all_four_questions_in_order() {
        let (_, transitions) = drive(&[true, true, true, true]);
        assert_eq!(transitions.len(), 4);
        assert_eq!(transitions[0], Transition::AskNext(1));
        assert_eq!(transitions[1], Transition::AskNext(2));
        assert_eq!(transitions[2], Transition::AskNext(3));
        let Transition::Finished(completion) = &transitions[3] else {
            panic!("expected a finished transition");
        };
        let submission = completion
            .submission
            .as_ref()
            .expect("full runs produce a submission");
        assert_eq!(submission.answers, AnswerSet::from_slots([true; 4]));
        assert_eq!(submission.level, Tier::Medium);
        assert!((submission.score - 0.645_656_3).abs() < 1e-6);
        assert_eq!(completion.result.message, Tier::Medium.advice());
    }

    #[test]
    fn mixed_answers_complete_with_the_matching_answer_set() {
        let (_, transitions) = drive(&[true, false, true, false]);
        let Some(Transition::Finished(completion)) = transitions.last() else {
            panic!("expected a finished transition");
        };
        let submission = completion
            .submission
            .as_ref()
            .expect("full runs produce a submission");
        assert_eq!(
            submission.answers,
            AnswerSet::from_slots([true, false, true, false])
        );
        assert!((submission.score - 0.487_502_6).abs() < 1e-6);
        assert_eq!(submission.level, Tier::Medium);
    }

    #[test]
    fn reset_returns_to_the_first_question() {
        let mid = QuizSession::new().answer(true).session.reset();
        assert_eq!(mid.state(), &QuizState::AskingQuestion(0));
        assert_eq!(mid.answers(), [None; QUESTION_COUNT]);
        assert_eq!(mid.current_question(), Some(QUESTION_TEXTS[0]));

        let (completed, _) = drive(&[false]);
        let fresh = completed.reset();
        assert_eq!(fresh.state(), &QuizState::AskingQuestion(0));

        let twice = fresh.reset().reset();
        assert_eq!(twice.state(), &QuizState::AskingQuestion(0));
        assert_eq!(twice.answers(), [None; QUESTION_COUNT]);
    }

    #[test]
    fn answering_a_completed_session_is_inert() {
        let (session, _) = drive(&[false]);
        let step = session.answer(true);
        let Transition::Finished(completion) = &step.transition else {
            panic!("expected a finished transition");
        };
        assert!(completion.submission.is_none());
        assert_eq!(completion.result.level, Tier::Low);
        assert!(matches!(step.session.state(), QuizState::Completed(_)));
    }

    #[test]
    fn question_catalog_matches_progression() {
        let mut session = QuizSession::new();
        for expected in QUESTION_TEXTS {
            assert_eq!(session.current_question(), Some(expected));
            session = session.answer(true).session;
        }
        assert_eq!(session.current_question(), None);
    }
}
