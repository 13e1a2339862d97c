use rand::Rng;

/// A survey question the demo seeder knows how to answer.
#[derive(Debug)]
pub struct CatalogQuestion {
    pub question_id: i64,
    pub text: &'static str,
    pub answers: AnswerKind,
}

/// The shape of the answers a question accepts.
#[derive(Debug)]
pub enum AnswerKind {
    /// Integer-coded answers drawn from an inclusive range
    Numeric { lo: i64, hi: i64 },
    /// One of a fixed set of answer texts
    Choice(&'static [&'static str]),
}

impl AnswerKind {
    /// Draw one plausible answer text for this kind of question.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> String {
        match self {
            AnswerKind::Numeric { lo, hi } => rng.gen_range(*lo..=*hi).to_string(),
            AnswerKind::Choice(options) => options[rng.gen_range(0..options.len())].to_string(),
        }
    }
}

pub fn load_question_catalog() -> Vec<CatalogQuestion> {
    vec![
        CatalogQuestion {
            question_id: 1,
            text: "What is your age?",
            answers: AnswerKind::Numeric { lo: 19, hi: 65 },
        },
        CatalogQuestion {
            question_id: 2,
            text: "What is your gender?",
            answers: AnswerKind::Choice(&["Male", "Female", "Non-binary", "Prefer not to answer"]),
        },
        CatalogQuestion {
            question_id: 3,
            text: "What country do you live in?",
            answers: AnswerKind::Choice(&[
                "United States of America",
                "United Kingdom",
                "Canada",
                "Germany",
                "Netherlands",
                "Australia",
                "Poland",
                "Sweden",
                "India",
                "Brazil",
            ]),
        },
        CatalogQuestion {
            question_id: 4,
            text: "Are you self-employed?",
            answers: AnswerKind::Choice(&["Yes", "No"]),
        },
        CatalogQuestion {
            question_id: 5,
            text: "Do you have a family history of mental illness?",
            answers: AnswerKind::Choice(&["Yes", "No", "I don't know"]),
        },
        CatalogQuestion {
            question_id: 6,
            text: "Have you ever sought treatment for a mental health disorder from a mental health professional?",
            answers: AnswerKind::Choice(&["Yes", "No"]),
        },
        CatalogQuestion {
            question_id: 7,
            text: "How many employees does your company or organization have?",
            answers: AnswerKind::Choice(&[
                "1-5",
                "6-25",
                "26-100",
                "100-500",
                "500-1000",
                "More than 1000",
            ]),
        },
        CatalogQuestion {
            question_id: 8,
            text: "Is your employer primarily a tech company/organization?",
            answers: AnswerKind::Choice(&["Yes", "No"]),
        },
        CatalogQuestion {
            question_id: 9,
            text: "Does your employer provide mental health benefits as part of healthcare coverage?",
            answers: AnswerKind::Choice(&["Yes", "No", "I don't know", "Not eligible for coverage"]),
        },
        CatalogQuestion {
            question_id: 10,
            text: "Do you know the options for mental health care available under your employer-provided health coverage?",
            answers: AnswerKind::Choice(&["Yes", "No", "I am not sure"]),
        },
        CatalogQuestion {
            question_id: 11,
            text: "Would you feel comfortable discussing a mental health issue with your coworkers?",
            answers: AnswerKind::Choice(&["Yes", "No", "Maybe"]),
        },
        CatalogQuestion {
            question_id: 12,
            text: "Would you bring up a mental health issue with a potential employer in an interview?",
            answers: AnswerKind::Choice(&["Yes", "No", "Maybe"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_question_ids_are_unique() {
        let catalog = load_question_catalog();
        let mut ids: Vec<i64> = catalog.iter().map(|q| q.question_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_sample_stays_inside_the_answer_pool() {
        let mut rng = rand::thread_rng();
        let numeric = AnswerKind::Numeric { lo: 19, hi: 65 };
        for _ in 0..20 {
            let value: i64 = numeric.sample(&mut rng).parse().unwrap();
            assert!((19..=65).contains(&value));
        }

        let choice = AnswerKind::Choice(&["Yes", "No"]);
        for _ in 0..20 {
            let text = choice.sample(&mut rng);
            assert!(text == "Yes" || text == "No");
        }
    }
}
