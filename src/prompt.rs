use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use crate::error::AppError;

/// Article categories with dedicated rewriting instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Travel,
    Medical,
    Finance,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Medical,
        Category::Finance,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Medical => "medical",
            Category::Finance => "finance",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Category::Food),
            "travel" => Ok(Category::Travel),
            "medical" => Ok(Category::Medical),
            "finance" => Ok(Category::Finance),
            "general" => Ok(Category::General),
            other => Err(AppError::InvalidCategory(other.to_string())),
        }
    }
}

/// Formatting and content rules shared by every category.
const CORE_RULES: &str = "\
Rewrite the following article in about 600-800 words (no less than 600), avoiding plagiarism. Follow the structure and instructions below carefully:

1. Start with an interactive intro (use \"Lykkers\", \"Friends\", or \"Readers\" when appropriate).
2. Be specific, vivid, and thematic. Avoid vague writing.
3. Use clear subheadings. Each paragraph must:
   - Have a subtitle of 3 words or fewer.
   - Be 4 lines or fewer.
   - Begin with <h3> and end with </h3>.
4. Bold all important terms with <b> and </b>.
5. Avoid first-person language.
6. No grammatical errors or AI-style phrasing.
7. Follow E-E-A-T principles.
8. Ensure correct English punctuation.
9. Prohibited topics: war, religion, alcohol, nudity, politics, pork, beef, LGBTQ+ references, bars/clubs, skin color.
10. Last paragraph is a reflective, actionable conclusion.
";

/// Closing block asking for the title and summary that end every rewrite.
const CLOSING_RULES: &str = "\
Finally:
- Provide a global title of 28 characters or fewer (creative, engaging).
- Provide a summary of 20 words or fewer using rhetoric (suspense, exaggeration, question, reversal).
";

fn category_rules(category: Category) -> &'static str {
    match category {
        Category::Food => {
            "\
Additional for Food:
- Warm, sensory style: focus on taste, texture, aroma, presentation.
- Include specific ingredients, techniques, local context.
- Provide approximate ingredient costs, prep time, and tools.
"
        }
        Category::Travel => {
            "\
Additional for Travel:
- Vivid scene: places, activities, transport, local culture, exact locations.
- Include budget tips: routes, times, costs, packing list.
- Highlight hidden gems or local secrets.
"
        }
        Category::Medical => {
            "\
Additional for Medical:
- Professional tone, expert-backed content.
- Explain symptoms, diagnostic steps, treatments, when to seek care.
- Reference authoritative terms (e.g., <b>CDC guidelines</b>, <b>clinical trials</b>).
- Comply with YMYL: factual, no sensationalism.
"
        }
        Category::Finance => {
            "\
Additional for Finance:
- Clear actionable advice: managing debt, saving, investing basics.
- Include figures: fees, rates, common pitfalls.
- Tone may be professional or relatable.
- Live examples: <b>credit score</b>, <b>loan interest</b>, <b>emergency fund</b>.
"
        }
        Category::General => {
            "\
Additional for General:
- Clear, relaxed tone with everyday examples.
- Offer fresh perspective on lifestyle/knowledge topics.
- Avoid cliches or overly broad statements.
"
        }
    }
}

/// Assembles the full rewriting prompt: shared rules, then the
/// category-specific block, then the title/summary request, then the
/// article text itself. Pure and deterministic.
pub fn build_prompt(text: &str, category: Category) -> String {
    let extra = category_rules(category);

    let mut prompt =
        String::with_capacity(CORE_RULES.len() + extra.len() + CLOSING_RULES.len() + text.len() + 16);
    prompt.push_str(CORE_RULES);
    prompt.push('\n');
    prompt.push_str(extra);
    prompt.push('\n');
    prompt.push_str(CLOSING_RULES);
    prompt.push_str("\nArticle:\n\n");
    prompt.push_str(text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_supported_category() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn rejects_unknown_categories() {
        for bad in ["sports", "Food", "FOOD", "", "food "] {
            match bad.parse::<Category>() {
                Err(AppError::InvalidCategory(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidCategory for {:?}, got {:?}", bad, other.map(|c| c.as_str())),
            }
        }
    }

    #[test]
    fn build_prompt_is_deterministic() {
        let text = "A short article about noodle soup.";
        let first = build_prompt(text, Category::Food);
        let second = build_prompt(text, Category::Food);
        assert_eq!(first, second);
    }

    #[test]
    fn prompt_ends_with_article_text() {
        let text = "The article body goes here.";
        let prompt = build_prompt(text, Category::Travel);
        assert!(prompt.ends_with(text));
        assert!(prompt.contains("Article:"));
    }

    #[test]
    fn prompt_carries_shared_and_category_rules() {
        let prompt = build_prompt("body", Category::Medical);
        assert!(prompt.contains("600-800 words"));
        assert!(prompt.contains("Additional for Medical:"));
        assert!(prompt.contains("title of 28 characters or fewer"));
    }

    #[test]
    fn category_blocks_are_distinct() {
        let text = "same input";
        let mut prompts: Vec<String> = Category::ALL
            .iter()
            .map(|c| build_prompt(text, *c))
            .collect();
        prompts.sort();
        prompts.dedup();
        assert_eq!(prompts.len(), Category::ALL.len());
    }
}
