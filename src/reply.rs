use std::fmt::Write;

/// Maximum number of recommendations listed in a reply
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Returned when no category scores above the similarity threshold.
pub const FALLBACK_RESPONSE: &str = "I apologize, but I'm not able to provide specific advice about that topic. \
Please consult with a healthcare professional for personalized medical advice.";

/// Returned when matching fails outright (embedding model down, timeout, ...).
pub const APOLOGY_RESPONSE: &str =
    "I apologize, but I'm having trouble processing your request. Please try again.";

const CLOSING_PROMPT: &str = "Would you like more specific information about any health topic !";

/// Builds the reply for a matched category: a header naming the category,
/// the first [`MAX_RECOMMENDATIONS`] entries as a numbered list, then a closing prompt.
pub fn format_response(category: &str, responses: &[String]) -> String {
    let mut response = format!(
        "Alright! Regarding {}, here are some recommendations:\n\n",
        category.replace('_', " ")
    );

    for (i, rec) in responses.iter().take(MAX_RECOMMENDATIONS).enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(response, "{}. {}", i + 1, rec);
    }

    response.push('\n');
    response.push_str(CLOSING_PROMPT);
    response
}
