use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QuizItem {
    pub text: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub answer: String,
    #[serde(default)]
    pub wrong: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuizFile {
    items: Vec<QuizItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Correct,
    /// Wrong pick; carries the right answer so it can be revealed.
    Wrong { answer: String },
    /// The round is already locked by an earlier pick.
    AlreadyAnswered,
}

/// Multiple-choice quiz over a fixed item list; one pick locks a round, and
/// `next` advances cyclically.
pub struct Quiz {
    items: Vec<QuizItem>,
    idx: usize,
    locked: bool,
}

impl Quiz {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: QuizFile = serde_json::from_str(raw)?;
        Ok(Self {
            items: file.items,
            idx: 0,
            locked: false,
        })
    }

    pub fn current(&self) -> Option<&QuizItem> {
        self.items.get(self.idx)
    }

    pub fn options(&self, rng: &mut impl Rng) -> Vec<String> {
        let Some(item) = self.current() else {
            return Vec::new();
        };

        let mut options: Vec<String> = std::iter::once(item.answer.clone())
            .chain(item.wrong.iter().cloned())
            .collect();
        options.shuffle(rng);
        options
    }

    pub fn choose(&mut self, option: &str) -> ChoiceOutcome {
        if self.locked {
            return ChoiceOutcome::AlreadyAnswered;
        }
        let Some(item) = self.current() else {
            return ChoiceOutcome::AlreadyAnswered;
        };

        let outcome = if option == item.answer {
            ChoiceOutcome::Correct
        } else {
            ChoiceOutcome::Wrong {
                answer: item.answer.clone(),
            }
        };
        self.locked = true;
        outcome
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.idx = (self.idx + 1) % self.items.len();
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE: &str = r#"{
        "items": [
            {"text": "In the beginning God created the heavens and the ___.", "ref": "Genesis 1:1", "answer": "earth", "wrong": ["sea", "light"]},
            {"text": "The Lord is my ___.", "ref": "Psalm 23:1", "answer": "shepherd", "wrong": ["rock"]}
        ]
    }"#;

    #[test]
    fn options_hold_the_answer_and_every_distractor() {
        let quiz = Quiz::from_json(SAMPLE).unwrap();
        let options = quiz.options(&mut StdRng::seed_from_u64(3));

        assert_eq!(options.len(), 3);
        assert!(options.contains(&"earth".to_string()));
        assert!(options.contains(&"sea".to_string()));
        assert!(options.contains(&"light".to_string()));
    }

    #[test]
    fn correct_pick_locks_the_round() {
        let mut quiz = Quiz::from_json(SAMPLE).unwrap();
        assert_eq!(quiz.choose("earth"), ChoiceOutcome::Correct);
        assert_eq!(quiz.choose("sea"), ChoiceOutcome::AlreadyAnswered);
    }

    #[test]
    fn wrong_pick_reveals_the_answer() {
        let mut quiz = Quiz::from_json(SAMPLE).unwrap();
        assert_eq!(
            quiz.choose("sea"),
            ChoiceOutcome::Wrong {
                answer: "earth".to_string()
            }
        );
    }

    #[test]
    fn next_wraps_and_unlocks() {
        let mut quiz = Quiz::from_json(SAMPLE).unwrap();
        quiz.choose("earth");

        quiz.next();
        assert_eq!(quiz.current().unwrap().reference, "Psalm 23:1");
        assert_eq!(quiz.choose("shepherd"), ChoiceOutcome::Correct);

        quiz.next();
        assert_eq!(quiz.current().unwrap().reference, "Genesis 1:1");
    }

    #[test]
    fn empty_deck_is_inert() {
        let mut quiz = Quiz::from_json(r#"{"items": []}"#).unwrap();
        assert!(quiz.current().is_none());
        assert!(quiz.options(&mut StdRng::seed_from_u64(1)).is_empty());
        assert_eq!(quiz.choose("anything"), ChoiceOutcome::AlreadyAnswered);
        quiz.next();
    }
}
