//! Instructions sent to the completion service

pub(crate) const CATEGORIZE: &str =
    "Categorize the following user story. Only return the category name.";

pub(crate) const CATEGORY_HINTS: &str = "Generate a list of possible categories based on the \
     following user stories. Only return the category names.";

pub(crate) const SUMMARIZE: &str = "Please create a summary of what the project is based on the \
     user stories which are input. Write about what is is based on the user stories but also \
     what it could become. Do not include any preamble like 'Here is the summary:'.";

pub(crate) const NO_EXISTING_STORIES: &str =
    "There are no existing user stories. Please generate initial stories for a new project.";

pub(crate) fn categorize_with_hints(hints: &[String]) -> String {
    if hints.is_empty() {
        return CATEGORIZE.to_string();
    }
    format!("{CATEGORIZE} Possible categories are: {}", hints.join(", "))
}

pub(crate) fn generate(count: usize) -> String {
    format!(
        "Based on the provided context of existing user stories (if any), generate exactly \
         {count} new, distinct, and relevant user stories. Each story should be a single \
         descriptive sentence, typically following a format like 'As a [user type], I want \
         [action] so that [benefit]'."
    )
}
