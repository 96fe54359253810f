//! Static category table: category key -> ordered canned responses.
//!
//! Keys are sometimes topics (`sleep_health`) and sometimes literal questions.
//! Order matters: the matcher walks categories in table order and keeps the
//! first one seen on equal scores.

use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct KnowledgeFile {
    #[serde(default, rename = "category")]
    categories: Vec<Category>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "sleep_health",
        &[
            "Maintain a consistent sleep schedule",
            "Aim for 7-9 hours of sleep per night",
            "Create a relaxing bedtime routine",
            "Avoid screens before bedtime",
            "Keep your bedroom cool and dark",
            "Limit caffeine intake after noon",
        ],
    ),
    (
        "nutrition",
        &[
            "Eat a balanced diet with plenty of fruits and vegetables",
            "Stay hydrated by drinking water throughout the day",
            "Limit processed foods and added sugars",
            "Include lean proteins in your diet",
            "Choose whole grains over refined grains",
        ],
    ),
    (
        "What is your name?",
        &["My name is Florence AI, am an Advanced health-care bot. Feel free to ask me any health related question."],
    ),
    (
        "What are the symptoms of diabetes?",
        &["Common symptoms include increased thirst, frequent urination, extreme fatigue, and blurred vision."],
    ),
    (
        "How can I lower my blood pressure?",
        &["Reduce salt intake, exercise regularly, manage stress, and eat a balanced diet."],
    ),
    (
        "What is the normal body temperature?",
        &["The normal body temperature is around 98.6°F (37°C)."],
    ),
    (
        "How do I treat a fever at home?",
        &["Stay hydrated, rest, and take fever reducers like paracetamol."],
    ),
    (
        "What are the early signs of COVID-19?",
        &["Early signs include fever, cough, fatigue, and loss of taste or smell."],
    ),
    (
        "How can I improve my immune system?",
        &["Eat a balanced diet, get enough sleep, exercise regularly, and reduce stress."],
    ),
    (
        "What are the symptoms of a heart attack?",
        &["Chest pain, shortness of breath, nausea, cold sweat, and discomfort in the arms or jaw."],
    ),
    (
        "What should I eat for a healthy heart?",
        &["Consume fruits, vegetables, whole grains, lean proteins, and avoid saturated fats."],
    ),
    (
        "What are the common causes of headaches?",
        &["Stress, dehydration, lack of sleep, eye strain, and sinus infections."],
    ),
    (
        "How can I manage stress effectively?",
        &["Practice meditation, deep breathing, exercise, and maintain a healthy work-life balance."],
    ),
    (
        "What are the symptoms of food poisoning?",
        &["Nausea, vomiting, diarrhea, stomach cramps, and fever."],
    ),
    (
        "How can I prevent dehydration?",
        &["Drink enough water daily, especially in hot weather or after physical activity."],
    ),
    (
        "What are the signs of depression?",
        &["Persistent sadness, loss of interest, fatigue, changes in appetite, and sleep disturbances."],
    ),
    (
        "How can I get better sleep?",
        &["Maintain a sleep schedule, limit screen time before bed, and avoid caffeine in the evening."],
    ),
    (
        "What are the symptoms of iron deficiency anemia?",
        &["Fatigue, pale skin, shortness of breath, dizziness, and cold hands or feet."],
    ),
    (
        "How can I maintain good eye health?",
        &["Eat vitamin-rich foods, reduce screen time, and wear UV-protected sunglasses."],
    ),
    (
        "What are the symptoms of an allergic reaction?",
        &["Eat vitamin-rich foods, reduce screen time, and wear UV-protected sunglasses."],
    ),
    (
        "How can I relieve back pain?",
        &["Maintain good posture, stretch regularly, and apply heat or ice packs."],
    ),
    (
        "What is the best way to lose weight healthily?",
        &["Eat a balanced diet, exercise regularly, and avoid processed foods."],
    ),
    (
        "How can I boost my energy levels naturally?",
        &["Stay hydrated, eat a nutritious diet, exercise, and get enough sleep."],
    ),
];

impl KnowledgeBase {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The health table shipped with the binary.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(name, responses)| Category {
                    name: (*name).to_string(),
                    responses: responses.iter().map(|r| (*r).to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Parses a TOML document made of `[[category]]` tables.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let file: KnowledgeFile = toml::from_str(content)?;
        Ok(Self::new(file.categories))
    }

    /// Loads the table once at startup. Never fails: a broken file yields an
    /// empty table so every message falls through to the fallback response.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            let kb = Self::builtin();
            info!("Knowledge base: using built-in table ({} categories)", kb.len());
            return kb;
        };

        let loaded = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::from_toml(&content));

        match loaded {
            Ok(kb) => {
                info!(
                    "Knowledge base: loaded {} categories from {}",
                    kb.len(),
                    path.display()
                );
                kb
            }
            Err(e) => {
                error!("Error loading knowledge base from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
