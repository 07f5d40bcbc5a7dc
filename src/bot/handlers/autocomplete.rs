//! Autocomplete handlers for Discord slash command parameters.

use crate::{
    bot::helpers::Context,
    core::question,
    core::text::char_len,
};
use poise::serenity_prelude::AutocompleteChoice;

/// Discord shows at most this many suggestions
const MAX_CHOICES: usize = 25;
/// Discord caps a choice's label at this many characters
const MAX_LABEL: usize = 100;

fn choice_label(number: i32, question: &str) -> String {
    let label = format!("#{number}: {question}");
    if char_len(&label) <= MAX_LABEL {
        return label;
    }
    let mut cut: String = label.chars().take(MAX_LABEL - 1).collect();
    cut.push('…');
    cut
}

/// Suggests unanswered question numbers of the current round.
///
/// Matches `partial` against the number or the question text. Database
/// errors yield no suggestions.
pub async fn autocomplete_question_number(ctx: Context<'_>, partial: &str) -> Vec<AutocompleteChoice> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };
    let questions = match question::unanswered(&ctx.data().database, &guild_id.to_string()).await {
        Ok(questions) => questions,
        Err(e) => {
            tracing::warn!("Question autocomplete failed: {}", e);
            return Vec::new();
        }
    };

    let partial = partial.trim().trim_start_matches('#').to_lowercase();
    questions
        .into_iter()
        .filter(|q| {
            partial.is_empty()
                || q.question_num.to_string().starts_with(&partial)
                || q.question.to_lowercase().contains(&partial)
        })
        .take(MAX_CHOICES)
        .map(|q| AutocompleteChoice::new(choice_label(q.question_num, &q.question), q.question_num))
        .collect()
}
